//! Default ordering of the project list.

use std::cmp::Ordering;
use std::sync::Arc;

use super::types::{Project, ProjectSortBy};

/// Sort projects for display: pinned first, then by `sort_by`.
///
/// Stable, so projects that compare equal keep their relative order.
pub fn sort_projects(projects: &mut [Arc<Project>], sort_by: ProjectSortBy) {
    projects.sort_by(|a, b| compare(a, b, sort_by));
}

fn compare(a: &Project, b: &Project, sort_by: ProjectSortBy) -> Ordering {
    b.top.cmp(&a.top).then_with(|| match sort_by {
        ProjectSortBy::Hits => b.hits.cmp(&a.hits),
        // Some(_) > None, so never-opened projects sink to the bottom
        ProjectSortBy::LastOpened => b.last_opened.cmp(&a.last_opened),
        ProjectSortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    })
}
