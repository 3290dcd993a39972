//! Utilities shared by the Parlor binaries: logger setup and time helpers.

pub mod logger;
pub mod time;
