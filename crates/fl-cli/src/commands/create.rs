//! Create command implementation

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{CreateArgs, CreateKind, GlobalArgs};
use crate::context::ProjectSettings;

const SQL_TEMPLATE: &str = "-- +migrate Up
-- SQL in this section is executed when the migration is applied.

-- +migrate Down
-- SQL in this section is executed when the migration is rolled back.
";

const SH_TEMPLATE: &str = "#!/bin/sh
# Invoked as: sh <file> up|down
# Environment: FLOCK_DATABASE_PATH, FLOCK_DIRECTION, FLOCK_VERSION
set -e

case \"$FLOCK_DIRECTION\" in
  up) ;;
  down) ;;
esac
";

const GO_TEMPLATE: &str = "package main

// Invoked as: go run <file> up|down
// Environment: FLOCK_DATABASE_PATH, FLOCK_DIRECTION, FLOCK_VERSION

import \"os\"

func main() {
\tswitch os.Getenv(\"FLOCK_DIRECTION\") {
\tcase \"up\":
\tcase \"down\":
\t}
}
";

impl CreateKind {
    fn extension(self) -> &'static str {
        match self {
            CreateKind::Sql => "sql",
            CreateKind::Sh => "sh",
            CreateKind::Go => "go",
        }
    }

    fn template(self) -> &'static str {
        match self {
            CreateKind::Sql => SQL_TEMPLATE,
            CreateKind::Sh => SH_TEMPLATE,
            CreateKind::Go => GO_TEMPLATE,
        }
    }

    fn comment_prefix(self) -> &'static str {
        match self {
            CreateKind::Sql => "--",
            CreateKind::Sh => "#",
            CreateKind::Go => "//",
        }
    }
}

/// Turn a free-form description into a file name fragment
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_string()
}

/// Write a new migration file with the next free version
fn create_migration(dir: &Path, version: i64, name: &str, kind: CreateKind) -> Result<PathBuf> {
    let slug = slugify(name);
    if slug.is_empty() {
        anyhow::bail!("Migration name '{}' has no usable characters", name);
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create migrations directory {}", dir.display()))?;

    let path = dir.join(format!("{}_{}.{}", version, slug, kind.extension()));
    if path.exists() {
        anyhow::bail!("Migration file already exists: {}", path.display());
    }

    let header = format!(
        "{} Created {}\n",
        kind.comment_prefix(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    let content = match kind {
        // Keep the shebang on the first line
        CreateKind::Sh => kind.template().replacen('\n', &format!("\n{header}"), 1),
        _ => format!("{header}{}", kind.template()),
    };

    fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Execute the create command
pub async fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let settings = ProjectSettings::load(global)?;
    let dir = settings.migrations_dir();

    let version = if dir.exists() {
        settings.catalog()?.next_version()
    } else {
        1
    };

    let path = create_migration(&dir, version, &args.name, args.kind)?;
    println!("flock: created {}", path.display());
    Ok(())
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
