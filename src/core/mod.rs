//! Boundary helpers and the services built on the ledger model.

pub mod dates;
pub mod services;
pub mod time;

pub use time::{Clock, FixedClock, SystemClock};
