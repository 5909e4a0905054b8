//! Single lot auction with a cumulative bid ladder.
//!
//! Accounts commit CCD towards the lot, every new cumulative total has to beat
//! the top bid by at least 5%, and late promoting bids push the deadline back.
//! On finalization the owner receives the winning bid and every other bidder
//! gets their deposit back, both minus a 2% commission.
#![cfg_attr(not(feature = "std"), no_std)]
use crate::{events::*, structs::*};
use commons::*;
use concordium_std::*;

mod contract;
mod events;
mod impls;
mod structs;
