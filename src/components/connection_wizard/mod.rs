// ABOUTME: Connection wizard module: provider/auth selection, forms, and connectivity probe
// ConnectionWizard drives the pure state machine and executes its effects

pub mod catalog;
pub mod component;
pub mod forms;
pub mod probe;
pub mod state;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::ConnectionResult;

pub use catalog::{AuthOption, Provider, PROVIDERS};
pub use component::ConnectionWizardComponent;
pub use forms::{FormVariant, ValidationError};
pub use probe::{run_probe, spawn_probe, ConnectionTester, PgTester, ProbeError, DEFAULT_PROBE_TIMEOUT};
pub use state::{Effect, ProbeOutcome, ProbeRequest, ProbeStatus, WizardMsg, WizardState, WizardStep};

/// Owns the wizard state plus the collaborators its effects need
pub struct ConnectionWizard {
    state: WizardState,
    tester: Arc<dyn ConnectionTester>,
    probe_timeout: Duration,
    tx: UnboundedSender<WizardMsg>,
    probe_task: Option<JoinHandle<()>>,
}

impl ConnectionWizard {
    /// `tx` is the channel probe results are reported on; the runtime reads it
    pub fn new(
        tester: Arc<dyn ConnectionTester>,
        probe_timeout: Duration,
        tx: UnboundedSender<WizardMsg>,
    ) -> Self {
        Self {
            state: WizardState::new(),
            tester,
            probe_timeout,
            tx,
            probe_task: None,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Apply a message and run the resulting effect. Returns true when the wizard is finished.
    pub fn handle(&mut self, msg: WizardMsg) -> bool {
        let state = std::mem::take(&mut self.state);
        let (state, effect) = state.update(msg);
        self.state = state;

        match effect {
            Effect::None => false,
            Effect::Probe(request) => {
                self.start_probe(request);
                false
            }
            Effect::Quit => {
                if let Some(task) = self.probe_task.take() {
                    task.abort();
                }
                true
            }
        }
    }

    pub fn is_probe_in_flight(&self) -> bool {
        self.probe_task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn into_result(self) -> ConnectionResult {
        self.state.into_result()
    }

    fn start_probe(&mut self, request: ProbeRequest) {
        if self.is_probe_in_flight() {
            debug!("Probe already in flight, not dispatching another");
            return;
        }
        self.probe_task = Some(spawn_probe(
            Arc::clone(&self.tester),
            request,
            self.probe_timeout,
            self.tx.clone(),
        ));
    }
}
