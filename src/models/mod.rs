//! Core data models for the stats tracker.

mod match_record;
mod stats;
mod summoner;

pub use match_record::*;
pub use stats::*;
pub use summoner::*;
