//! # CLI Layer
//!
//! This module is **one possible UI client** for shelf, not the application
//! itself. It is the only place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! Commands read `shelf <entity> <action> …`: `shelf book add Dune --author
//! "Frank Herbert"`, `shelf edition edit 3 isbn 9780441013593`,
//! `shelf read add book:dune --started 2024-05-01`.
//!
//! ## Structure
//!
//! - `setup`: clap definitions
//! - `commands`: dispatch and per-command handlers
//! - `print`: rendering of listings, details, status and messages
//! - `styles`: terminal styles

mod commands;
mod print;
pub mod setup;
mod styles;

pub use commands::{parse, run};
