//! Command driver for the launcher core.
//!
//! Owns the project collection, the live search, the recording session and
//! the accelerator registry, and turns `ExternalCommand`s into `Response`s.
//! The host loop calls `tick` between commands so debounced index rebuilds
//! and finished conflict probes get applied.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::config::Config;
use crate::error::{LauncherError, ResultExt};
use crate::projects::{load_projects, sort_projects, Project, ProjectSearch};
use crate::shortcuts::{
    Accelerator, AcceleratorRegistry, KeyOutcome, Platform, ProbeDispatcher, RecorderSnapshot,
    RecordingSession, GLOBAL_OWNER,
};
use crate::stdin_commands::ExternalCommand;

/// One JSON line written back to the host.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Response {
    ProjectsUpdated {
        #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        count: usize,
        /// False while the new collection waits for a debounced rebuild
        indexed: bool,
    },
    SearchResults {
        #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        query: String,
        projects: Vec<Project>,
    },
    SortedProjects {
        #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        projects: Vec<Project>,
    },
    IndexRebuilt {
        generation: u64,
        projects: usize,
    },
    Recorder {
        #[serde(flatten)]
        snapshot: RecorderSnapshot,
    },
    ShortcutRegistered {
        owner: String,
        accelerator: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        replaced: Option<String>,
    },
    ShortcutUnregistered {
        owner: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        accelerator: Option<String>,
    },
    Error {
        #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        command: String,
        message: String,
    },
}

impl Response {
    fn error(request_id: Option<String>, command: &str, error: &LauncherError) -> Self {
        tracing::warn!(
            category = "DRIVER",
            command,
            severity = ?error.severity(),
            error = %error,
            "Command failed"
        );
        Response::Error {
            request_id,
            command: command.to_string(),
            message: error.user_message(),
        }
    }
}

fn to_owned_projects(projects: &[Arc<Project>]) -> Vec<Project> {
    projects.iter().map(|p| Project::clone(p)).collect()
}

pub struct Driver {
    config: Config,
    platform: Platform,
    projects: Vec<Arc<Project>>,
    search: ProjectSearch,
    session: RecordingSession,
    registry: Arc<AcceleratorRegistry>,
    dispatcher: ProbeDispatcher,
}

impl Driver {
    pub fn new(config: Config) -> Self {
        let registry = Arc::new(AcceleratorRegistry::new());

        if let Some(shortcut) = config.global_shortcut {
            registry
                .register(GLOBAL_OWNER, shortcut)
                .map_err(LauncherError::from)
                .log_err();
        }

        let dispatcher = ProbeDispatcher::new(registry.clone());

        Self {
            platform: config.recorder.display_platform(),
            search: ProjectSearch::new(&config.search),
            projects: Vec::new(),
            session: RecordingSession::new(),
            registry,
            dispatcher,
            config,
        }
    }

    pub fn registry(&self) -> &AcceleratorRegistry {
        &self.registry
    }

    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    pub fn search(&self) -> &ProjectSearch {
        &self.search
    }

    fn snapshot(&self) -> Response {
        Response::Recorder {
            snapshot: self.session.snapshot(self.platform),
        }
    }

    /// Apply due index rebuilds and finished probes.
    pub fn tick(&mut self, now: Instant) -> Vec<Response> {
        let mut responses = Vec::new();

        if self.search.poll(now) {
            if let Some(index) = self.search.builder().current() {
                responses.push(Response::IndexRebuilt {
                    generation: index.generation(),
                    projects: index.len(),
                });
            }
        }

        let mut recorder_changed = false;
        for outcome in self.dispatcher.drain() {
            recorder_changed |= self.session.apply_probe_outcome(outcome);
        }
        if recorder_changed {
            responses.push(self.snapshot());
        }

        responses
    }

    /// Handle one command. `Wait` is the host loop's job and yields nothing here.
    pub fn handle(&mut self, command: ExternalCommand, now: Instant) -> Vec<Response> {
        let kind = command.kind();
        tracing::debug!(category = "DRIVER", command = kind, "Handling command");

        match command {
            ExternalCommand::SetProjects {
                projects,
                request_id,
            } => vec![self.replace_projects(projects, request_id, now)],

            ExternalCommand::LoadProjects { path, request_id } => {
                let path = PathBuf::from(shellexpand::tilde(&path).as_ref());
                match load_projects(&path) {
                    Ok(projects) => vec![self.replace_projects(projects, request_id, now)],
                    Err(e) => vec![Response::error(request_id, kind, &e)],
                }
            }

            ExternalCommand::Search {
                query,
                limit,
                request_id,
            } => {
                let start = Instant::now();
                let mut results = self.search.rank(&query, &self.projects);
                if let Some(limit) = limit {
                    results.truncate(limit);
                }
                crate::logging::log_perf("search", start.elapsed().as_millis() as u64, 16);
                vec![Response::SearchResults {
                    request_id,
                    query,
                    projects: to_owned_projects(&results),
                }]
            }

            ExternalCommand::Sort {
                sort_by,
                request_id,
            } => {
                let mut sorted = self.projects.clone();
                sort_projects(&mut sorted, sort_by.unwrap_or(self.config.project_sort_by));
                vec![Response::SortedProjects {
                    request_id,
                    projects: to_owned_projects(&sorted),
                }]
            }

            ExternalCommand::StartRecording { owner } => {
                let current = owner
                    .as_deref()
                    .and_then(|owner| self.registry.binding_for(owner));
                self.session.start_recording_for(current);
                vec![self.snapshot()]
            }

            ExternalCommand::KeyDown { event } => {
                if let KeyOutcome::Captured(request) = self.session.record_key(&event) {
                    self.dispatcher.dispatch(request);
                }
                vec![self.snapshot()]
            }

            ExternalCommand::StopRecording => {
                self.session.stop_recording();
                vec![self.snapshot()]
            }

            ExternalCommand::RegisterShortcut { owner, accelerator } => {
                let registered = Accelerator::parse(&accelerator)
                    .map_err(LauncherError::from)
                    .and_then(|accel| {
                        self.registry
                            .register(&owner, accel)
                            .map(|replaced| (accel, replaced))
                            .map_err(LauncherError::from)
                    });
                match registered {
                    Ok((accel, replaced)) => vec![Response::ShortcutRegistered {
                        owner,
                        accelerator: accel.to_canonical_string(),
                        replaced: replaced.map(|a| a.to_canonical_string()),
                    }],
                    Err(e) => vec![Response::error(None, kind, &e)],
                }
            }

            ExternalCommand::UnregisterShortcut { owner } => {
                let removed = self.registry.unregister(&owner);
                vec![Response::ShortcutUnregistered {
                    owner,
                    accelerator: removed.map(|a| a.to_canonical_string()),
                }]
            }

            ExternalCommand::Wait { .. } => Vec::new(),
        }
    }

    fn replace_projects(
        &mut self,
        projects: Vec<Project>,
        request_id: Option<String>,
        now: Instant,
    ) -> Response {
        self.projects = projects.into_iter().map(Arc::new).collect();
        let indexed = self.search.on_projects_changed(self.projects.clone(), now);
        Response::ProjectsUpdated {
            request_id,
            count: self.projects.len(),
            indexed,
        }
    }

    /// Apply anything still pending before shutdown: a waiting index rebuild
    /// and probes that have already finished.
    pub fn finish(&mut self) -> Vec<Response> {
        let mut responses = Vec::new();
        if self.search.flush() {
            if let Some(index) = self.search.builder().current() {
                responses.push(Response::IndexRebuilt {
                    generation: index.generation(),
                    projects: index.len(),
                });
            }
        }
        responses.extend(self.tick(Instant::now()));
        responses
    }
}
