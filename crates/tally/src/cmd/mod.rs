//! Command implementations for the Tally CLI

pub mod chart;
pub mod seed;
pub mod serve;
