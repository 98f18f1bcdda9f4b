//! # CLI Module
//!
//! Command-line interface for the `loam-gen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Scan, validate, and write the routes file:
//!
//! ```bash
//! loam-gen generate --app-dir src/app --output src/routes.rs
//! ```
//!
//! ### `list`
//!
//! Scan and validate, then print the discovered routes and their active
//! layouts without writing anything:
//!
//! ```bash
//! loam-gen list --app-dir src/app
//! ```
//!
//! ### `watch`
//!
//! Generate once, then keep regenerating on app-directory changes with a
//! debounce window:
//!
//! ```bash
//! loam-gen watch --app-dir src/app --output src/routes.rs --debounce-ms 300
//! ```
//!
//! `generate` and `list` require the app directory to exist and exit
//! non-zero on scan or validation failure.

mod commands;

pub use commands::{run_cli, Cli, Commands};
