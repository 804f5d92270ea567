// ABOUTME: Wizard runtime: terminal lifecycle, input thread, and the async message loop

pub mod events;
pub mod runner;
pub mod terminal;

pub use events::EventHandler;
pub use runner::{
    connection_wizard_session, init_wizard_session, run_connection_wizard, run_init_wizard,
    run_screen, WizardScreen,
};
pub use terminal::{cleanup_terminal, restore_terminal, setup_terminal, WizardTerminal};
