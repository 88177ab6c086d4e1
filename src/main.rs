//! JSONL driver for the launcher core.
//!
//! Reads `ExternalCommand`s from stdin, writes one JSON response per line to
//! stdout. Logs go to stderr and ~/.project-launcher/logs/launcher-core.jsonl.

use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_channel::TryRecvError;

use launcher_core::config;
use launcher_core::driver::{Driver, Response};
use launcher_core::logging;
use launcher_core::stdin_commands::{self, ExternalCommand};

/// How often timers and probe outcomes are polled while idle
const TICK: Duration = Duration::from_millis(10);

fn emit(out: &mut impl Write, responses: Vec<Response>) -> Result<()> {
    if responses.is_empty() {
        return Ok(());
    }
    for response in &responses {
        serde_json::to_writer(&mut *out, response).context("Failed to serialize response")?;
        writeln!(out).context("Failed to write response")?;
    }
    out.flush().context("Failed to flush stdout")
}

fn main() -> Result<()> {
    let _guard = logging::init();

    let config = config::load_config();
    tracing::info!(
        debounce_ms = config.search.debounce_ms,
        sort_by = ?config.project_sort_by,
        global_shortcut = ?config.global_shortcut.map(|a| a.to_canonical_string()),
        "Launcher core starting"
    );

    let mut driver = Driver::new(config);
    let commands = stdin_commands::start_stdin_listener();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    loop {
        emit(&mut out, driver.tick(Instant::now()))?;

        match commands.try_recv() {
            Ok(ExternalCommand::Wait { ms }) => {
                let deadline = Instant::now() + Duration::from_millis(ms);
                loop {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    std::thread::sleep(TICK.min(deadline - now));
                    emit(&mut out, driver.tick(Instant::now()))?;
                }
            }
            Ok(command) => emit(&mut out, driver.handle(command, Instant::now()))?,
            Err(TryRecvError::Empty) => std::thread::sleep(TICK),
            Err(TryRecvError::Closed) => break,
        }
    }

    emit(&mut out, driver.finish())?;
    tracing::info!(event_type = "app_lifecycle", action = "stopped", "Launcher core exiting");
    Ok(())
}
