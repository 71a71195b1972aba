//! Utilities shared across layers.

pub mod logger;
pub mod time;
