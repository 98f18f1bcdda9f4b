//! # loam-routegen
//!
//! **loam-routegen** is the file-based routing compiler for the Loam web
//! framework. It scans an application directory tree of handler sources,
//! reconstructs the implicit route hierarchy from filesystem conventions,
//! validates that hierarchy for ambiguity, and emits a single Rust source
//! file registering every route against a `loam::Router` with correctly
//! ordered, inherited layout middleware.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`tree`]** - the arena-backed route tree and derived URL patterns
//! - **[`scan`]** - directory walking and static handler analysis via `syn`
//! - **[`layout`]** - per-route layout middleware chains
//! - **[`validator`]** - structural invariant checks on the finished tree
//! - **[`generator`]** - deterministic code synthesis via Askama templates
//! - **[`manifest`]** - enclosing-project resolution from `Cargo.toml`
//! - **[`hot_reload`]** - debounced regeneration on app-directory changes
//! - **[`cli`]** - the `loam-gen` command-line surface
//!
//! ## Pipeline
//!
//! ```text
//! Cargo.toml → Scanner → Route Tree → Validator → Generator → routes.rs
//!                                         │
//!                                  Layout Chains
//! ```
//!
//! The pipeline is single-threaded and synchronous; each run owns its own
//! tree, so repeated runs are idempotent and safe. The only concurrency sits
//! in the optional [`hot_reload`] driver, which coalesces filesystem events
//! and re-runs the whole pipeline.
//!
//! ## Conventions
//!
//! ```text
//! src/app/
//! ├── pages/                elided from URLs
//! │   ├── layout.rs         pub fn layout, wraps every page below
//! │   ├── page.rs           pub fn GET → GET /
//! │   └── users/
//! │       ├── page.rs       pub fn GET, pub fn POST → /users
//! │       └── [id]/
//! │           └── page.rs   pub fn GET → /users/{id}
//! └── api/                  retained in URLs
//!     └── users/
//!         └── route.rs      pub fn GET → /api/users
//! ```

pub mod cli;
pub mod generator;
pub mod hot_reload;
pub mod layout;
pub mod manifest;
pub mod scan;
pub mod tree;
pub mod validator;

pub use generator::{collect_routes, generate_routes, render_routes, RouteSummary};
pub use layout::{layout_chain, LayoutEntry};
pub use manifest::{resolve_manifest, ProjectManifest};
pub use scan::scan_app;
pub use tree::{Method, NodeId, RouteNode, RouteTree, Segment};
pub use validator::{ensure_valid, validate_tree, ValidationIssue};
