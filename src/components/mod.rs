// ABOUTME: UI components for the wizards: input primitives, shared drawing helpers, and wizard screens

pub mod connection_wizard;
pub mod focus_group;
pub mod form_view;
pub mod init_wizard;
pub mod path_completer;
pub mod text_field;

pub use connection_wizard::{ConnectionWizard, ConnectionWizardComponent, WizardState};
pub use focus_group::{FocusCommand, FocusGroup};
pub use init_wizard::{InitState, InitWizardComponent};
pub use path_completer::PathCompleter;
pub use text_field::TextField;
