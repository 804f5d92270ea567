// ABOUTME: Terminal lifecycle: raw mode and alternate screen on entry, restored on exit or panic

use anyhow::{bail, Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, IsTerminal, Stdout};

pub type WizardTerminal = Terminal<CrosstermBackend<Stdout>>;

pub fn setup_terminal() -> Result<WizardTerminal> {
    if !io::stdout().is_terminal() {
        bail!(
            "No TTY detected. The wizard requires an interactive terminal.\n\
             Try running directly in a terminal instead of redirecting output."
        );
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        cleanup_terminal();
        return Err(e).context("Failed to enter alternate screen");
    }

    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

pub fn restore_terminal(terminal: &mut WizardTerminal) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Best-effort restore without a terminal handle, used from the panic hook
pub fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}
