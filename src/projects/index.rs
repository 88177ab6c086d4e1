//! Project search index and its debounced builder.
//!
//! An index is an immutable snapshot: lowercase copies of the searchable
//! fields next to the shared project handle. Rebuilding produces a fresh
//! `Arc<ProjectIndex>` that replaces the previous one as a whole, so a query
//! never sees a half-built index.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::debounce::Debouncer;
use crate::logging;

use super::types::Project;

/// Builds slower than this are logged as warnings.
const SLOW_BUILD_MS: u64 = 50;

/// One indexed project with pre-folded search fields.
#[derive(Debug)]
pub struct IndexEntry {
    pub project: Arc<Project>,
    pub name_lower: String,
    pub alias_lower: Option<String>,
    pub path_lower: String,
}

impl IndexEntry {
    fn new(project: Arc<Project>) -> Self {
        Self {
            name_lower: project.name.to_lowercase(),
            alias_lower: project.alias.as_ref().map(|a| a.to_lowercase()),
            path_lower: project.path.to_lowercase(),
            project,
        }
    }

    /// Name or alias starts with `query_lower`.
    pub fn has_prefix(&self, query_lower: &str) -> bool {
        self.name_lower.starts_with(query_lower)
            || self
                .alias_lower
                .as_deref()
                .is_some_and(|alias| alias.starts_with(query_lower))
    }
}

#[derive(Debug)]
pub struct ProjectIndex {
    generation: u64,
    entries: Vec<IndexEntry>,
}

impl ProjectIndex {
    /// Build an index from a collection snapshot.
    ///
    /// Entries keep collection order; later duplicates of a path are dropped.
    pub fn build(generation: u64, projects: &[Arc<Project>]) -> Self {
        let start = Instant::now();
        let mut seen = HashSet::with_capacity(projects.len());
        let entries: Vec<IndexEntry> = projects
            .iter()
            .filter(|p| seen.insert(p.path.as_str()))
            .map(|p| IndexEntry::new(Arc::clone(p)))
            .collect();

        let duplicates = projects.len() - entries.len();
        if duplicates > 0 {
            tracing::debug!(
                category = "INDEX",
                duplicates,
                "Dropped projects with duplicate paths"
            );
        }

        logging::log_perf(
            "project_index_build",
            start.elapsed().as_millis() as u64,
            SLOW_BUILD_MS,
        );

        Self {
            generation,
            entries,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Owns the live index and debounces rebuilds.
///
/// The first snapshot is indexed immediately. Later snapshots wait out the
/// debounce window; a newer snapshot inside the window replaces the older
/// one, so a burst of changes costs a single rebuild.
#[derive(Debug)]
pub struct IndexBuilder {
    current: Option<Arc<ProjectIndex>>,
    debouncer: Debouncer<Vec<Arc<Project>>>,
    next_generation: u64,
    rebuilds: u64,
}

impl IndexBuilder {
    pub fn new(debounce: Duration) -> Self {
        Self {
            current: None,
            debouncer: Debouncer::new(debounce),
            next_generation: 1,
            rebuilds: 0,
        }
    }

    /// Feed a new collection snapshot.
    ///
    /// Returns true if the index was rebuilt right away.
    pub fn on_projects_changed(&mut self, snapshot: Vec<Arc<Project>>, now: Instant) -> bool {
        if self.current.is_none() {
            self.debouncer.cancel();
            self.install(&snapshot);
            return true;
        }

        let superseded = self.debouncer.schedule(snapshot, now);
        tracing::debug!(
            category = "INDEX",
            superseded,
            "Scheduled project index rebuild"
        );
        false
    }

    /// Rebuild if the pending snapshot is due. Returns true if rebuilt.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.debouncer.take_due(now) {
            Some(snapshot) => {
                self.install(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Rebuild from the pending snapshot now, ignoring the window.
    pub fn flush(&mut self) -> bool {
        match self.debouncer.cancel() {
            Some(snapshot) => {
                self.install(&snapshot);
                true
            }
            None => false,
        }
    }

    fn install(&mut self, snapshot: &[Arc<Project>]) {
        let index = ProjectIndex::build(self.next_generation, snapshot);
        self.next_generation += 1;
        self.rebuilds += 1;
        tracing::info!(
            category = "INDEX",
            generation = index.generation(),
            projects = index.len(),
            "Project index rebuilt"
        );
        self.current = Some(Arc::new(index));
    }

    /// The live index, if one was ever built.
    pub fn current(&self) -> Option<Arc<ProjectIndex>> {
        self.current.clone()
    }

    pub fn is_rebuild_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// When the pending rebuild is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debouncer.set_window(debounce);
    }
}
