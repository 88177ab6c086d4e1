//! Project search and ordering.
//!
//! - `types` - the `Project` record and cache loading
//! - `index` - immutable search index and its debounced builder
//! - `search` - fuzzy ranking with the prefix boost
//! - `sort` - default list order

mod index;
mod search;
mod sort;
mod types;

pub use index::{IndexBuilder, IndexEntry, ProjectIndex};
pub use search::{fuzzy_candidates, rank_index, ProjectSearch, ScoredEntry, SearchOptions};
pub use sort::sort_projects;
pub use types::{load_projects, Project, ProjectSortBy, VersionControl};

#[cfg(test)]
#[path = "projects_tests.rs"]
mod tests;
