//! Migration map: the ordered, linked working set for a run

use crate::migration::{Direction, Migration, MigrationSource};
use std::collections::HashMap;

/// Selected migrations sorted in traversal order.
///
/// Links between migrations are version numbers looked up in `migrations`,
/// never references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationMap {
    /// Versions in traversal order
    pub versions: Vec<i64>,

    /// Migrations keyed by version
    pub migrations: HashMap<i64, Migration>,

    /// Traversal direction
    pub direction: Direction,
}

impl MigrationMap {
    /// An empty map, nothing to run
    pub fn empty(direction: Direction) -> Self {
        Self {
            versions: Vec::new(),
            migrations: HashMap::new(),
            direction,
        }
    }

    /// Sort `selected` for `direction` and thread previous/next links.
    pub fn build<I>(selected: I, direction: Direction) -> Self
    where
        I: IntoIterator<Item = (i64, MigrationSource)>,
    {
        let mut map = Self::empty(direction);
        for (version, source) in selected {
            map.versions.push(version);
            map.migrations
                .insert(version, Migration::new(version, source));
        }

        map.versions.sort_unstable();
        map.versions.dedup();
        if direction == Direction::Down {
            map.versions.reverse();
        }

        let mut previous: Option<i64> = None;
        for &version in &map.versions {
            if let Some(current) = map.migrations.get_mut(&version) {
                current.previous = previous;
            }
            if let Some(prev) = previous.and_then(|p| map.migrations.get_mut(&p)) {
                prev.next = Some(version);
            }
            previous = Some(version);
        }

        map
    }

    /// Whether there is nothing to run
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Number of selected migrations
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// First version visited
    pub fn first(&self) -> Option<i64> {
        self.versions.first().copied()
    }

    /// Last version visited
    pub fn last(&self) -> Option<i64> {
        self.versions.last().copied()
    }

    /// Look up a migration by version
    pub fn get(&self, version: i64) -> Option<&Migration> {
        self.migrations.get(&version)
    }

    /// Migrations in traversal order
    pub fn iter(&self) -> impl Iterator<Item = &Migration> {
        self.versions
            .iter()
            .filter_map(|v| self.migrations.get(v))
    }
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
