//! fl-core - Core library for Flock
//!
//! This crate provides configuration parsing, migration file discovery,
//! version range resolution, and the linked migration map shared by the
//! runner and the CLI.

pub mod catalog;
pub mod config;
pub mod error;
pub mod migration;
pub mod plan;
pub mod resolver;
pub mod sql_script;

pub use catalog::Catalog;
pub use config::{Config, DatabaseConfig, ResolvedTarget, TargetConfig};
pub use error::{CoreError, CoreResult};
pub use migration::{parse_version, Direction, Migration, MigrationKind, MigrationSource};
pub use plan::MigrationMap;
pub use resolver::{plan_migrations, plan_rollback, resolve, Resolution};
pub use sql_script::split_statements;
