//! Data types shared by the aggregator and the masker.

pub mod config;
pub mod group;
pub mod replacement;
pub mod token;
