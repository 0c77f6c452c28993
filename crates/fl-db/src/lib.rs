//! fl-db - Database layer for Flock
//!
//! This crate provides the `Database` trait, its DuckDB implementation,
//! and the version store that records which migration is applied.

pub mod duckdb;
pub mod error;
pub mod traits;
pub mod version_store;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;
pub use version_store::{VersionRecord, VersionStore, DEFAULT_VERSION_TABLE};
