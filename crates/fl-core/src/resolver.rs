//! Range resolution: which migrations run, and in which direction
//!
//! Moving up applies every migration in `(current, target]`. Moving down
//! reverts every migration in `[target, current]`, so the target itself is
//! reverted too. Without a requested target, everything newer than the
//! current version is applied.

use crate::catalog::Catalog;
use crate::migration::Direction;
use crate::plan::MigrationMap;

/// Outcome of resolving a current/target version pair against a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Currently applied version
    pub current: i64,

    /// Target as requested by the caller (`None` = most recent)
    pub requested: Option<i64>,

    /// Effective target after substituting the most recent version
    pub target: Option<i64>,

    /// Direction of travel, `None` when current and target are equal
    pub direction: Option<Direction>,
}

impl Resolution {
    /// Whether `version` falls inside the range to run
    pub fn includes(&self, version: i64) -> bool {
        let current = self.current;
        match self.requested {
            None => self.target.is_some() && version > current,
            Some(target) if target > current => version > current && version <= target,
            Some(target) if target < current => version >= target && version <= current,
            Some(_) => false,
        }
    }

    /// Build the linked migration map for this resolution
    pub fn plan(&self, catalog: &Catalog) -> MigrationMap {
        let direction = self.direction.unwrap_or(Direction::Up);
        if self.direction.is_none() {
            return MigrationMap::empty(direction);
        }

        let selected = catalog
            .iter()
            .filter(|(v, _)| self.includes(*v))
            .map(|(v, source)| (v, source.clone()));
        MigrationMap::build(selected, direction)
    }
}

/// Resolve `requested` against `current` and the catalog
pub fn resolve(current: i64, requested: Option<i64>, catalog: &Catalog) -> Resolution {
    let target = requested.or_else(|| catalog.most_recent_version());

    let direction = match target {
        Some(t) if t > current => Some(Direction::Up),
        Some(t) if t < current => Some(Direction::Down),
        _ => None,
    };

    Resolution {
        current,
        requested,
        target,
        direction,
    }
}

/// Resolve and build the migration map in one step
pub fn plan_migrations(current: i64, requested: Option<i64>, catalog: &Catalog) -> MigrationMap {
    let resolution = resolve(current, requested, catalog);
    log::debug!(
        "Resolved current={} requested={:?} -> target={:?} direction={:?}",
        resolution.current,
        resolution.requested,
        resolution.target,
        resolution.direction
    );
    resolution.plan(catalog)
}

/// Map that reverts only the migration for `current`.
///
/// Empty when no file exists for the current version.
pub fn plan_rollback(current: i64, catalog: &Catalog) -> MigrationMap {
    match catalog.get(current) {
        Some(source) if current > 0 => {
            MigrationMap::build([(current, source.clone())], Direction::Down)
        }
        _ => MigrationMap::empty(Direction::Down),
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
