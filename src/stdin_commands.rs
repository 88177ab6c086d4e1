//! External command handling via stdin.
//!
//! This module provides the ability to drive the launcher core via stdin JSONL
//! commands. This is primarily used for testing and automation.
//!
//! # Protocol
//!
//! Commands are sent as JSON objects, one per line (JSONL format):
//!
//! ```json
//! {"type": "setProjects", "projects": [{"name": "Foo Bar", "path": "/a"}]}
//! {"type": "loadProjects", "path": "~/.project-launcher/cache.json"}
//! {"type": "search", "query": "bar", "requestId": "req-1"}
//! {"type": "sort", "sortBy": "last_opened"}
//! {"type": "startRecording", "owner": "global"}
//! {"type": "keyDown", "code": "KeyA", "ctrl": true}
//! {"type": "stopRecording"}
//! {"type": "registerShortcut", "owner": "vscode", "accelerator": "Alt+Shift+V"}
//! {"type": "unregisterShortcut", "owner": "vscode"}
//! {"type": "wait", "ms": 350}
//! ```
//!
//! # Example Usage
//!
//! ```bash
//! printf '%s\n' \
//!   '{"type": "setProjects", "projects": [{"name": "Barometer", "path": "/b"}]}' \
//!   '{"type": "search", "query": "bar"}' | ./launcher-core
//! ```

use serde::Deserialize;

use crate::projects::{Project, ProjectSortBy};
use crate::shortcuts::RawKeyEvent;

/// External commands that can be sent to the launcher core via stdin
///
/// Query-style commands accept an optional `requestId` that is echoed in the
/// response and attached to related log lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExternalCommand {
    /// Replace the project collection
    SetProjects {
        projects: Vec<Project>,
        #[serde(default, rename = "requestId")]
        request_id: Option<String>,
    },
    /// Replace the project collection from a JSON file
    LoadProjects {
        path: String,
        #[serde(default, rename = "requestId")]
        request_id: Option<String>,
    },
    /// Rank the current collection for a query
    Search {
        query: String,
        /// Only return the first `limit` results
        #[serde(default)]
        limit: Option<usize>,
        #[serde(default, rename = "requestId")]
        request_id: Option<String>,
    },
    /// Return the collection in display order
    Sort {
        /// Falls back to the configured order
        #[serde(default, rename = "sortBy")]
        sort_by: Option<ProjectSortBy>,
        #[serde(default, rename = "requestId")]
        request_id: Option<String>,
    },
    /// Start a recording session, optionally for an existing binding
    StartRecording {
        #[serde(default)]
        owner: Option<String>,
    },
    /// One raw key-down event
    KeyDown {
        #[serde(flatten)]
        event: RawKeyEvent,
    },
    /// Stop recording; the last capture stays readable
    StopRecording,
    /// Bind an accelerator to an owner
    RegisterShortcut { owner: String, accelerator: String },
    /// Remove an owner's binding
    UnregisterShortcut { owner: String },
    /// Let timers and probes progress for `ms` milliseconds
    Wait { ms: u64 },
}

impl ExternalCommand {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ExternalCommand::SetProjects { .. } => "setProjects",
            ExternalCommand::LoadProjects { .. } => "loadProjects",
            ExternalCommand::Search { .. } => "search",
            ExternalCommand::Sort { .. } => "sort",
            ExternalCommand::StartRecording { .. } => "startRecording",
            ExternalCommand::KeyDown { .. } => "keyDown",
            ExternalCommand::StopRecording => "stopRecording",
            ExternalCommand::RegisterShortcut { .. } => "registerShortcut",
            ExternalCommand::UnregisterShortcut { .. } => "unregisterShortcut",
            ExternalCommand::Wait { .. } => "wait",
        }
    }
}

/// Start a thread that listens on stdin for external JSONL commands.
/// Returns an async_channel::Receiver that can be awaited without polling.
///
/// # Channel Capacity
///
/// Uses a bounded channel with capacity of 100 to prevent unbounded memory growth.
/// The reader blocks when the driver falls behind.
///
/// # Thread Safety
///
/// Spawns a background thread that reads stdin line-by-line. When the channel
/// is closed (receiver dropped), the thread will exit gracefully. The channel
/// closes when stdin reaches EOF.
pub fn start_stdin_listener() -> async_channel::Receiver<ExternalCommand> {
    let (tx, rx) = async_channel::bounded(100);

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        read_commands(stdin.lock(), &tx);
    });

    rx
}

/// Parse JSONL commands from `reader` and forward them until EOF, a read
/// error, or a closed channel. Malformed lines are logged and skipped.
pub fn read_commands<R: std::io::BufRead>(
    reader: R,
    tx: &async_channel::Sender<ExternalCommand>,
) {
    tracing::info!(category = "STDIN", "External command listener started");

    for line in reader.lines() {
        match line {
            Ok(line) if !line.trim().is_empty() => {
                tracing::debug!(category = "STDIN", line = %line, "Received");
                match serde_json::from_str::<ExternalCommand>(&line) {
                    Ok(cmd) => {
                        tracing::debug!(category = "STDIN", command = cmd.kind(), "Parsed command");
                        // send_blocking is used since we're in a sync thread
                        if tx.send_blocking(cmd).is_err() {
                            tracing::info!(category = "STDIN", "Command channel closed, exiting");
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(category = "STDIN", error = %e, "Failed to parse command");
                    }
                }
            }
            Ok(_) => {} // Empty line, ignore
            Err(e) => {
                tracing::error!(category = "STDIN", error = %e, "Error reading stdin");
                break;
            }
        }
    }

    tracing::info!(category = "STDIN", "External command listener exiting");
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_projects_deserialization() {
        let json = r#"{"type": "setProjects", "projects": [{"name": "Foo", "path": "/foo"}]}"#;
        let cmd: ExternalCommand = serde_json::from_str(json).unwrap();
        match cmd {
            ExternalCommand::SetProjects {
                projects,
                request_id,
            } => {
                assert_eq!(projects.len(), 1);
                assert_eq!(projects[0].path, "/foo");
                assert!(request_id.is_none());
            }
            _ => panic!("Expected SetProjects command"),
        }
    }

    #[test]
    fn test_search_with_request_id() {
        let json = r#"{"type": "search", "query": "bar", "requestId": "req-123"}"#;
        let cmd: ExternalCommand = serde_json::from_str(json).unwrap();
        match cmd {
            ExternalCommand::Search {
                query,
                limit,
                request_id,
            } => {
                assert_eq!(query, "bar");
                assert_eq!(limit, None);
                assert_eq!(request_id, Some("req-123".to_string()));
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_sort_by_is_snake_case() {
        let json = r#"{"type": "sort", "sortBy": "last_opened"}"#;
        let cmd: ExternalCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(
            cmd,
            ExternalCommand::Sort {
                sort_by: Some(ProjectSortBy::LastOpened),
                ..
            }
        ));
    }

    #[test]
    fn test_key_down_flattens_event() {
        let json = r#"{"type": "keyDown", "code": "KeyA", "ctrl": true}"#;
        let cmd: ExternalCommand = serde_json::from_str(json).unwrap();
        match cmd {
            ExternalCommand::KeyDown { event } => {
                assert_eq!(event, RawKeyEvent::new("KeyA").with_ctrl());
            }
            _ => panic!("Expected KeyDown command"),
        }
    }

    #[test]
    fn test_unit_commands() {
        let cmd: ExternalCommand = serde_json::from_str(r#"{"type": "stopRecording"}"#).unwrap();
        assert!(matches!(cmd, ExternalCommand::StopRecording));

        let cmd: ExternalCommand =
            serde_json::from_str(r#"{"type": "startRecording"}"#).unwrap();
        assert!(matches!(cmd, ExternalCommand::StartRecording { owner: None }));
    }

    #[test]
    fn test_register_shortcut_deserialization() {
        let json = r#"{"type": "registerShortcut", "owner": "vscode", "accelerator": "Alt+V"}"#;
        let cmd: ExternalCommand = serde_json::from_str(json).unwrap();
        assert_eq!(cmd.kind(), "registerShortcut");
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(serde_json::from_str::<ExternalCommand>(r#"{"type": "explode"}"#).is_err());
        assert!(serde_json::from_str::<ExternalCommand>(r#"{"query": "x"}"#).is_err());
    }

    #[test]
    fn test_read_commands_skips_bad_lines() {
        let input = "\n{\"type\": \"stopRecording\"}\nnot json\n{\"type\": \"wait\", \"ms\": 5}\n";
        let (tx, rx) = async_channel::bounded(10);
        read_commands(std::io::Cursor::new(input), &tx);
        drop(tx);

        let kinds: Vec<&str> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|c| c.kind())
            .collect();
        assert_eq!(kinds, vec!["stopRecording", "wait"]);
    }

    #[test]
    fn test_read_commands_stops_when_receiver_dropped() {
        let input = "{\"type\": \"stopRecording\"}\n{\"type\": \"stopRecording\"}\n";
        let (tx, rx) = async_channel::bounded(10);
        drop(rx);
        read_commands(std::io::Cursor::new(input), &tx);
        assert!(tx.is_closed());
    }
}
