//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `seed` - Load the bundled catalog
//! - `inspect` - Dump stored data to stdout

pub mod args;

pub use args::{Cli, Commands};
