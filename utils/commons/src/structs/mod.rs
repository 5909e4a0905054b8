use super::*;

mod percentage;

pub use percentage::*;
