//! fl-migrate - Migration execution for Flock
//!
//! This crate runs a resolved migration map against a database: each
//! migration is dispatched to the SQL or script executor and the resulting
//! version is recorded before the next step starts.

pub mod error;
pub mod executor;
pub mod runner;

pub use error::{MigrateError, MigrateResult};
pub use executor::{execute_migration, ExecutionContext};
pub use runner::{version_after, RunReport, Runner, StepOutcome};
