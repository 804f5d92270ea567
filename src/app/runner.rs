// ABOUTME: Async message loop that draws a wizard and feeds it one message at a time
// Generic over the ratatui backend so tests can run the loop against TestBackend

use anyhow::{bail, Result};
use ratatui::{backend::Backend, Frame, Terminal};
use std::sync::Arc;
use tracing::{error, info};

use super::events::EventHandler;
use super::terminal::{cleanup_terminal, restore_terminal, setup_terminal, WizardTerminal};
use crate::components::connection_wizard::{
    ConnectionTester, ConnectionWizard, ConnectionWizardComponent, WizardMsg,
};
use crate::components::init_wizard::{default_templates, InitResult, InitState, InitWizardComponent};
use crate::config::WizardConfig;
use crate::models::ConnectionResult;

/// A wizard the loop can drive
pub trait WizardScreen {
    /// Returns true once the wizard has finished
    fn handle(&mut self, msg: WizardMsg) -> bool;
    fn render(&self, frame: &mut Frame);
}

impl WizardScreen for ConnectionWizard {
    fn handle(&mut self, msg: WizardMsg) -> bool {
        ConnectionWizard::handle(self, msg)
    }

    fn render(&self, frame: &mut Frame) {
        ConnectionWizardComponent::new().render(frame, frame.size(), self.state());
    }
}

impl WizardScreen for InitState {
    fn handle(&mut self, msg: WizardMsg) -> bool {
        InitState::handle(self, msg)
    }

    fn render(&self, frame: &mut Frame) {
        InitWizardComponent::new().render(frame, frame.size(), self);
    }
}

/// Process messages until the screen reports it is finished
pub async fn run_screen<B: Backend, S: WizardScreen>(
    terminal: &mut Terminal<B>,
    screen: &mut S,
    events: &mut EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| screen.render(frame))?;

        let Some(msg) = events.next().await else {
            bail!("Event channel closed before the wizard finished");
        };
        if screen.handle(msg) {
            return Ok(());
        }
    }
}

/// Run the connection wizard on an already prepared terminal
pub async fn connection_wizard_session<B: Backend>(
    terminal: &mut Terminal<B>,
    events: &mut EventHandler,
    tester: Arc<dyn ConnectionTester>,
    config: &WizardConfig,
) -> Result<ConnectionResult> {
    let mut wizard = ConnectionWizard::new(tester, config.probe_timeout(), events.sender());
    run_screen(terminal, &mut wizard, events).await?;

    let result = wizard.into_result();
    info!(cancelled = result.cancelled, tested = result.tested, "Connection wizard closed");
    Ok(result)
}

/// Run the init wizard, then the connection wizard if the user asked for it
pub async fn init_wizard_session<B: Backend>(
    terminal: &mut Terminal<B>,
    events: &mut EventHandler,
    tester: Arc<dyn ConnectionTester>,
    config: &WizardConfig,
    target_dir: Option<&str>,
) -> Result<InitResult> {
    let mut state = InitState::new(target_dir, default_templates(), config.ui.dirs_only);
    run_screen(terminal, &mut state, events).await?;

    let mut result = state.into_result();
    info!(cancelled = result.cancelled, template = %result.template, "Init wizard closed");

    if result.setup_config && !result.cancelled {
        terminal.clear()?;
        let connection = connection_wizard_session(terminal, events, tester, config).await?;
        result.connection = Some(connection);
    }
    Ok(result)
}

/// Full-screen connection wizard on the real terminal
pub async fn run_connection_wizard(
    tester: Arc<dyn ConnectionTester>,
    config: &WizardConfig,
) -> Result<ConnectionResult> {
    let (mut terminal, mut events) = start(config)?;
    let result = connection_wizard_session(&mut terminal, &mut events, tester, config).await;
    finish(&mut terminal, &mut events);
    result
}

/// Full-screen init wizard on the real terminal
pub async fn run_init_wizard(
    tester: Arc<dyn ConnectionTester>,
    config: &WizardConfig,
    target_dir: Option<&str>,
) -> Result<InitResult> {
    let (mut terminal, mut events) = start(config)?;
    let result = init_wizard_session(&mut terminal, &mut events, tester, config, target_dir).await;
    finish(&mut terminal, &mut events);
    result
}

fn start(config: &WizardConfig) -> Result<(WizardTerminal, EventHandler)> {
    let terminal = setup_terminal()?;
    let mut events = EventHandler::new(config.tick_rate());
    events.drain();
    Ok((terminal, events))
}

fn finish(terminal: &mut WizardTerminal, events: &mut EventHandler) {
    events.shutdown();
    if let Err(e) = restore_terminal(terminal) {
        error!("Failed to restore terminal: {}", e);
        cleanup_terminal();
    }
}
