//! It exposes all common constants, errors and fixed-point helpers used by
//! the settlement auction contract.
#![cfg_attr(not(feature = "std"), no_std)]
pub use crate::{calculations::*, constants::*, errors::*, structs::*, types::*};
use concordium_std::*;

mod calculations;
mod constants;
mod errors;
mod structs;
mod types;
