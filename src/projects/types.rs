//! Project records and cache loading.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LauncherError, Result};

/// Version control system detected for a project directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionControl {
    Git,
    Svn,
    Mercurial,
    #[default]
    None,
}

/// A filesystem project as cached by the launcher.
///
/// `path` is the identity key. Search and sort never mutate a project; they
/// reorder shared `Arc<Project>` handles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub hits: u32,
    /// Pinned to the top of the default list
    #[serde(default)]
    pub top: bool,
    #[serde(default)]
    pub last_opened: Option<DateTime<Utc>>,
    /// Detected language/framework, e.g. "rust", "node"
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub version_control: VersionControl,
    /// Launcher used to open this project, if not the default
    #[serde(default)]
    pub launcher_id: Option<String>,
    /// Added by hand rather than found by a scan
    #[serde(default)]
    pub is_custom: bool,
}

impl Project {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            alias: None,
            hits: 0,
            top: false,
            last_opened: None,
            project_type: None,
            version_control: VersionControl::None,
            launcher_id: None,
            is_custom: false,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Default order of the project list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSortBy {
    #[default]
    Hits,
    LastOpened,
    Name,
}

/// On-disk layouts accepted by `load_projects`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectFile {
    Cache { projects: Vec<Project> },
    List(Vec<Project>),
}

/// Load projects from a JSON file: either a bare array or a scan cache
/// object with a `projects` field.
pub fn load_projects(path: &Path) -> Result<Vec<Project>> {
    let content = std::fs::read_to_string(path).map_err(|source| LauncherError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let projects = match serde_json::from_str(&content)? {
        ProjectFile::Cache { projects } | ProjectFile::List(projects) => projects,
    };

    tracing::info!(
        category = "PROJECTS",
        path = %path.display(),
        count = projects.len(),
        "Loaded projects"
    );

    Ok(projects)
}
