//! Commands module - CLI command implementations.
//!
//! Each command is implemented in its own module for separation of concerns.

pub mod inspect;
pub mod migrate;
pub mod seed;
pub mod serve;
