// ABOUTME: Step state machine for the connection wizard
// Pure transitions: update consumes the state and a message, returns the next state plus an effect

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info, warn};

use super::catalog::{AuthOption, Provider, PROVIDERS};
use super::forms::{FormVariant, ValidationError};
use crate::components::focus_group::{FocusCommand, FocusGroup};
use crate::models::{ConnectionConfig, ConnectionResult};

/// Braille dot spinner shown while a probe is running
pub const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Steps in the connection wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    SelectProvider,
    /// Skipped for providers with a single auth option
    SelectAuth,
    InputForm(FormVariant),
    TestConnection,
    Done,
}

/// Result of one connectivity probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Connected { info: String },
    Failed { error: String },
}

impl ProbeOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProbeStatus {
    #[default]
    Idle,
    Running,
    Finished(ProbeOutcome),
}

/// Everything a probe task needs, detached from the wizard state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub config: ConnectionConfig,
    pub management_database: String,
}

/// Input to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardMsg {
    Key(KeyEvent),
    Tick,
    ProbeFinished(ProbeOutcome),
    Resize(u16, u16),
}

/// Work the runtime performs after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Probe(ProbeRequest),
    Quit,
}

#[derive(Debug, Clone)]
pub struct WizardState {
    step: WizardStep,
    provider: Option<&'static Provider>,
    auth: Option<&'static AuthOption>,
    provider_cursor: usize,
    auth_cursor: usize,
    inputs: FocusGroup,
    validation_error: Option<ValidationError>,
    probe: ProbeStatus,
    spinner_frame: usize,
    cursor_visible: bool,
    result: ConnectionResult,
    width: u16,
    height: u16,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            step: WizardStep::SelectProvider,
            provider: None,
            auth: None,
            provider_cursor: 0,
            auth_cursor: 0,
            inputs: FocusGroup::empty(),
            validation_error: None,
            probe: ProbeStatus::Idle,
            spinner_frame: 0,
            cursor_visible: true,
            result: ConnectionResult::default(),
            width: 80,
            height: 24,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn provider(&self) -> Option<&'static Provider> {
        self.provider
    }

    pub fn auth(&self) -> Option<&'static AuthOption> {
        self.auth
    }

    pub fn provider_cursor(&self) -> usize {
        self.provider_cursor
    }

    pub fn auth_cursor(&self) -> usize {
        self.auth_cursor
    }

    pub fn inputs(&self) -> &FocusGroup {
        &self.inputs
    }

    pub fn focus_index(&self) -> usize {
        self.inputs.focus_index()
    }

    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.validation_error.as_ref()
    }

    pub fn probe(&self) -> &ProbeStatus {
        &self.probe
    }

    pub fn is_testing(&self) -> bool {
        matches!(self.probe, ProbeStatus::Running)
    }

    pub fn test_done(&self) -> bool {
        matches!(self.probe, ProbeStatus::Finished(_))
    }

    /// `None` until the probe has finished
    pub fn test_ok(&self) -> Option<bool> {
        match &self.probe {
            ProbeStatus::Finished(outcome) => Some(outcome.is_ok()),
            _ => None,
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn result(&self) -> &ConnectionResult {
        &self.result
    }

    pub fn into_result(self) -> ConnectionResult {
        self.result
    }

    pub fn is_done(&self) -> bool {
        self.step == WizardStep::Done
    }

    /// Apply one message
    pub fn update(mut self, msg: WizardMsg) -> (Self, Effect) {
        match msg {
            WizardMsg::Key(key) => self.handle_key(key),
            WizardMsg::Tick => {
                self.on_tick();
                (self, Effect::None)
            }
            WizardMsg::ProbeFinished(outcome) => {
                self.on_probe_finished(outcome);
                (self, Effect::None)
            }
            WizardMsg::Resize(width, height) => {
                self.width = width;
                self.height = height;
                (self, Effect::None)
            }
        }
    }

    fn handle_key(self, key: KeyEvent) -> (Self, Effect) {
        if key.kind == KeyEventKind::Release {
            return (self, Effect::None);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return self.cancel();
        }

        match self.step {
            WizardStep::SelectProvider => self.update_provider_selection(key),
            WizardStep::SelectAuth => self.update_auth_selection(key),
            WizardStep::InputForm(variant) => self.update_input_form(variant, key),
            WizardStep::TestConnection => self.update_test_connection(key),
            WizardStep::Done => (self, Effect::None),
        }
    }

    fn update_provider_selection(mut self, key: KeyEvent) -> (Self, Effect) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.provider_cursor = self.provider_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.provider_cursor + 1 < PROVIDERS.len() {
                    self.provider_cursor += 1;
                }
            }
            KeyCode::Enter => {
                let Some(provider) = PROVIDERS.get(self.provider_cursor) else {
                    return (self, Effect::None);
                };
                self.provider = Some(provider);
                info!(provider = provider.id, "Provider selected");

                if provider.has_single_auth() {
                    self.auth = provider.auth_options.first();
                    self.enter_form();
                } else {
                    self.auth = None;
                    self.auth_cursor = 0;
                    self.step = WizardStep::SelectAuth;
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => return self.cancel(),
            _ => debug!(code = ?key.code, "Ignored key on provider selection"),
        }
        (self, Effect::None)
    }

    fn update_auth_selection(mut self, key: KeyEvent) -> (Self, Effect) {
        let Some(provider) = self.provider else {
            self.step = WizardStep::SelectProvider;
            return (self, Effect::None);
        };

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.auth_cursor = self.auth_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.auth_cursor + 1 < provider.auth_options.len() {
                    self.auth_cursor += 1;
                }
            }
            KeyCode::Enter => {
                self.auth = provider.auth_options.get(self.auth_cursor);
                if let Some(auth) = self.auth {
                    info!(provider = provider.id, auth = auth.id, "Auth method selected");
                    self.enter_form();
                }
            }
            KeyCode::Esc => {
                self.auth = None;
                self.step = WizardStep::SelectProvider;
            }
            KeyCode::Char('q') => return self.cancel(),
            _ => debug!(code = ?key.code, "Ignored key on auth selection"),
        }
        (self, Effect::None)
    }

    fn update_input_form(mut self, variant: FormVariant, key: KeyEvent) -> (Self, Effect) {
        let shift_tab = key.code == KeyCode::BackTab
            || (key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT));

        match key.code {
            _ if shift_tab => {
                let cmd = self.inputs.retreat();
                self.apply_focus(cmd);
            }
            KeyCode::Tab | KeyCode::Down => {
                let cmd = self.inputs.advance();
                self.apply_focus(cmd);
            }
            KeyCode::Up => {
                let cmd = self.inputs.retreat();
                self.apply_focus(cmd);
            }
            KeyCode::Enter if !self.inputs.is_last() => {
                let cmd = self.inputs.advance();
                self.apply_focus(cmd);
            }
            KeyCode::Enter => return self.submit(variant),
            KeyCode::Esc => {
                self.inputs = FocusGroup::empty();
                self.validation_error = None;
                self.step = match self.provider {
                    Some(p) if !p.has_single_auth() => WizardStep::SelectAuth,
                    _ => WizardStep::SelectProvider,
                };
            }
            _ => {
                self.validation_error = None;
                self.cursor_visible = true;
                self.inputs.handle_key(key);
            }
        }
        (self, Effect::None)
    }

    fn submit(mut self, variant: FormVariant) -> (Self, Effect) {
        if let Err(err) = variant.validate(&self.inputs) {
            debug!(error = %err, "Form validation failed");
            self.validation_error = Some(err);
            return (self, Effect::None);
        }
        self.validation_error = None;

        let Some(auth) = self.auth else {
            return (self, Effect::None);
        };
        let (config, management_database) = variant.build_config(auth, &self.inputs);
        self.result.config = config.clone();
        self.result.management_database = management_database.clone();

        self.step = WizardStep::TestConnection;
        self.probe = ProbeStatus::Running;
        self.spinner_frame = 0;
        info!(target_db = %config.target_label(), auth = %config.auth_method, "Dispatching connection probe");

        (
            self,
            Effect::Probe(ProbeRequest {
                config,
                management_database,
            }),
        )
    }

    fn update_test_connection(mut self, key: KeyEvent) -> (Self, Effect) {
        let Some(ok) = self.test_ok() else {
            debug!(code = ?key.code, "Ignored key while probe is running");
            return (self, Effect::None);
        };

        match key.code {
            KeyCode::Enter if ok => {
                self.result.tested = true;
                self.step = WizardStep::Done;
                info!("Connection wizard finished");
                (self, Effect::Quit)
            }
            KeyCode::Enter | KeyCode::Esc => {
                self.enter_form();
                (self, Effect::None)
            }
            _ => (self, Effect::None),
        }
    }

    fn on_tick(&mut self) {
        match self.step {
            WizardStep::TestConnection if self.is_testing() => {
                self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
            }
            WizardStep::InputForm(_) => self.cursor_visible = !self.cursor_visible,
            _ => {}
        }
    }

    fn on_probe_finished(&mut self, outcome: ProbeOutcome) {
        if !self.is_testing() {
            debug!("Dropping probe result with no probe in flight");
            return;
        }
        match &outcome {
            ProbeOutcome::Connected { info } => info!(%info, "Probe succeeded"),
            ProbeOutcome::Failed { error } => warn!(%error, "Probe failed"),
        }
        self.probe = ProbeStatus::Finished(outcome);
    }

    /// Enter the form for the committed provider/auth pair with fresh inputs
    fn enter_form(&mut self) {
        let (Some(provider), Some(auth)) = (self.provider, self.auth) else {
            self.step = WizardStep::SelectProvider;
            return;
        };
        let variant = FormVariant::for_selection(provider, auth);
        self.inputs = FocusGroup::new(variant.fields(provider));
        self.validation_error = None;
        self.probe = ProbeStatus::Idle;
        self.cursor_visible = true;
        self.step = WizardStep::InputForm(variant);
        info!(?variant, "Entered input form");
    }

    fn apply_focus(&mut self, cmd: FocusCommand) {
        if let FocusCommand::Focus(_) = cmd {
            self.cursor_visible = true;
        }
    }

    fn cancel(mut self) -> (Self, Effect) {
        info!(step = ?self.step, "Connection wizard cancelled");
        self.result = ConnectionResult::cancelled();
        self.probe = ProbeStatus::Idle;
        self.step = WizardStep::Done;
        (self, Effect::Quit)
    }
}
