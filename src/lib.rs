//! # Quayside
//!
//! Metadata store for a self-hostable container registry, usable both as a
//! standalone binary and as a library.
//!
//! The binary's main job is the bootstrap seeder: given an empty store it
//! establishes the uniqueness constraints and inserts the default reference
//! data (access levels, roles), the `admin`/`anonymous` identities, the
//! `library` project, the admin membership, and a schema version marker.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! quayside = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use quayside::seed;
//! use quayside::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/quayside.db").unwrap();
//! let summary = seed::run(&store).unwrap();
//! println!("seeded schema {}", summary.schema_version);
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the binary's clap surface. Disable with
//!   `default-features = false` for library use.

pub mod auth;
pub mod config;
pub mod error;
pub mod seed;
pub mod store;
pub mod types;
