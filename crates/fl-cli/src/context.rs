//! Runtime context for CLI commands

use anyhow::{Context, Result};
use fl_core::{Catalog, Config, ResolvedTarget};
use fl_db::{Database, DuckDbBackend, VersionStore};
use fl_migrate::{ExecutionContext, Runner};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Loaded project configuration with the selected target applied
pub struct ProjectSettings {
    /// Project root directory
    pub root: PathBuf,

    /// Parsed configuration
    pub config: Config,

    /// Target after applying overrides
    pub target: ResolvedTarget,
}

impl ProjectSettings {
    /// Load config and resolve the target selected by global arguments
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let root = args.project_dir.clone();

        // Load config from custom path or project directory
        let config = if let Some(config_path) = &args.config {
            Config::load(config_path).context("Failed to load configuration file")?
        } else {
            Config::load_from_dir(&root).context("Failed to load project configuration")?
        };

        let mut target = config
            .resolve_target(args.target.as_deref())
            .context("Failed to resolve target")?;
        if let Some(path) = &args.database {
            target.database.path = path.clone();
        } else if target.database.path != ":memory:" && Path::new(&target.database.path).is_relative() {
            target.database.path = root.join(&target.database.path).display().to_string();
        }

        Ok(Self {
            root,
            config,
            target,
        })
    }

    /// Absolute migrations directory
    pub fn migrations_dir(&self) -> PathBuf {
        self.target.migrations_dir_absolute(&self.root)
    }

    /// Discover migrations for this project
    pub fn catalog(&self) -> Result<Catalog> {
        let dir = self.migrations_dir();
        Catalog::discover(&dir)
            .with_context(|| format!("Failed to collect migrations from {}", dir.display()))
    }
}

/// Runtime context containing loaded settings and database connection
pub struct RuntimeContext {
    /// Project settings
    pub settings: ProjectSettings,

    /// Database connection
    pub db: Arc<dyn Database>,

    /// Applied version store
    pub store: VersionStore,

    /// Verbose output enabled
    pub verbose: bool,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let settings = ProjectSettings::load(args)?;

        let db: Arc<dyn Database> = Arc::new(
            DuckDbBackend::new(&settings.target.database.path)
                .context("Failed to connect to database")?,
        );
        log::debug!(
            "Connected to {} database at {}",
            db.db_type(),
            settings.target.database.path
        );

        let store = VersionStore::new(settings.config.version_table.clone());
        log::debug!("Tracking versions in {}", store.table());

        Ok(Self {
            settings,
            db,
            store,
            verbose: args.verbose,
        })
    }

    /// Current version, bootstrapping the version table if needed
    pub async fn current_version(&self) -> Result<i64> {
        self.store
            .ensure_current_version(self.db.as_ref())
            .await
            .context("Couldn't get/set database version")
    }

    /// Runner bound to this context's database and store
    pub fn runner(&self) -> Runner<'_> {
        Runner::new(
            self.db.as_ref(),
            &self.store,
            ExecutionContext {
                database_path: self.settings.target.database.path.clone(),
            },
        )
    }

    /// Print verbose output if enabled
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }
}
