//! # Shelf Architecture
//!
//! Shelf is a **UI-agnostic library catalogue**: books and their editions,
//! magazines and issues, papers, the people who wrote them, and the
//! acquisitions, reads and files attached to any of those. The `shelf` binary
//! is one client of this library.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Callers pick the entity type (`api.list::<Book>(..)`)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic: get-or-create, lookup, edit, cascade     │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DataStore trait with closure-based transactions          │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Records and Subjects
//!
//! Every entity is a [`store::Record`] living in its own typed table. Slugs
//! are derived on save ([`slug`]). Acquisitions, reads and files point at a
//! [`model::Subject`]: a book, edition, issue, magazine or paper, referenced
//! by typed id.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward code never writes to stdout/stderr and never calls
//! `std::process::exit`. Commands return data (`Listing`, `Details`,
//! `CmdResult`) and the CLI decides how it looks.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): thorough unit tests against
//!    `InMemoryStore`. Most of the testing lives here.
//! 2. **API** (`api.rs`): dispatch tests.
//! 3. **CLI** (`tests/cli.rs`): the binary run against a temporary data
//!    directory.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Business logic for each command
//! - [`store`]: Storage abstraction, tables and implementations
//! - [`model`]: Entity types and typed ids
//! - [`slug`]: Slug derivation and the save policy
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod slug;
pub mod store;
