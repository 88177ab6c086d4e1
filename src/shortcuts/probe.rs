//! Conflict probing for captured accelerators.
//!
//! A `ConflictProber` answers "is this canonical accelerator already bound?".
//! The recorder never calls it directly: a valid capture yields a
//! `ProbeRequest`, the host hands it to a `ProbeDispatcher`, and the
//! `ProbeOutcome` comes back on a channel to be applied to the session.
//! Key handling never waits on a probe.

use std::sync::Arc;

use thiserror::Error;

/// Failure of a conflict probe. Never fatal: the session keeps its last flag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("conflict check transport failed: {0}")]
    Transport(String),
    #[error("conflict prober is unavailable")]
    Unavailable,
}

/// External collaborator that knows which accelerators are already registered.
pub trait ConflictProber: Send + Sync {
    /// True iff `candidate` (canonical form) is registered by any component.
    fn check_accelerator(&self, candidate: &str) -> Result<bool, ProbeError>;
}

impl<P: ConflictProber + ?Sized> ConflictProber for Arc<P> {
    fn check_accelerator(&self, candidate: &str) -> Result<bool, ProbeError> {
        (**self).check_accelerator(candidate)
    }
}

/// A probe issued by the recorder for one specific capture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeRequest {
    /// Session generation of the capture that issued this probe
    pub generation: u64,
    /// Canonical accelerator string
    pub accelerator: String,
}

/// Result of a probe, tagged with the request that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub request: ProbeRequest,
    pub result: Result<bool, ProbeError>,
}

/// Runs probes off the caller's path and reports outcomes on a channel.
///
/// Each probe runs on its own short-lived thread. Outcomes arrive in completion
/// order, which is not necessarily dispatch order.
pub struct ProbeDispatcher {
    prober: Arc<dyn ConflictProber>,
    tx: async_channel::Sender<ProbeOutcome>,
    rx: async_channel::Receiver<ProbeOutcome>,
}

impl ProbeDispatcher {
    pub fn new(prober: Arc<dyn ConflictProber>) -> Self {
        let (tx, rx) = async_channel::unbounded();
        Self { prober, tx, rx }
    }

    /// Fire-and-forget: start the probe and return immediately.
    pub fn dispatch(&self, request: ProbeRequest) {
        let prober = Arc::clone(&self.prober);
        let tx = self.tx.clone();

        tracing::debug!(
            accelerator = %request.accelerator,
            generation = request.generation,
            "Dispatching conflict probe"
        );

        std::thread::spawn(move || {
            let result = prober.check_accelerator(&request.accelerator);
            // The receiver lives as long as the dispatcher; a send failure only
            // means the host shut down.
            let _ = tx.send_blocking(ProbeOutcome { request, result });
        });
    }

    /// Receiver for outcomes, for hosts that await them.
    pub fn outcomes(&self) -> &async_channel::Receiver<ProbeOutcome> {
        &self.rx
    }

    /// Drain all outcomes that have already arrived.
    pub fn drain(&self) -> Vec<ProbeOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            outcomes.push(outcome);
        }
        outcomes
    }
}
