// ABOUTME: Renders the init wizard screens from InitState

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    Frame,
};
use std::fs;
use std::path::PathBuf;

use super::state::{InitState, InitStep};
use crate::components::form_view::{
    error_line, field_lines, help_line, option_lines, render_lines, render_panel, render_shell,
    subtitle_line, MUTED_GRAY,
};

pub const TITLE: &str = "pgmi init - Project Setup";

pub struct InitWizardComponent;

impl InitWizardComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &InitState) {
        let help = match state.step() {
            InitStep::Directory => {
                help_line(&[("enter", "confirm"), ("tab", "complete"), ("esc", "cancel")])
            }
            InitStep::Template => {
                help_line(&[("↑/↓", "navigate"), ("enter", "select"), ("esc", "back")])
            }
            InitStep::SetupChoice => {
                help_line(&[("↑/↓", "toggle"), ("enter", "select"), ("esc", "back")])
            }
        };
        let content = render_shell(frame, area, TITLE, help);

        match state.step() {
            InitStep::Directory => self.render_directory(frame, content, state),
            InitStep::Template => self.render_template(frame, content, state),
            InitStep::SetupChoice => self.render_setup_choice(frame, content, state),
        }
    }

    fn render_directory(&self, frame: &mut Frame, area: Rect, state: &InitState) {
        let inner = render_panel(frame, area, "Directory");

        let mut lines = vec![
            subtitle_line("Where do you want to create the project?"),
            Line::default(),
        ];
        lines.extend(field_lines(state.dir_input(), state.cursor_visible()));
        lines.push(Line::default());

        if let Some(err) = state.dir_error() {
            lines.push(error_line(&err.to_string()));
            lines.push(muted("Choose a different location or remove existing files."));
            lines.push(muted("pgmi.yaml and .env are allowed."));
        } else {
            lines.push(muted("Press enter for current directory, or type a path."));
        }

        render_lines(frame, inner, lines);
    }

    fn render_template(&self, frame: &mut Frame, area: Rect, state: &InitState) {
        let inner = render_panel(frame, area, "Template");
        let target = &state.result().target_dir;
        let abs = fs::canonicalize(target).unwrap_or_else(|_| PathBuf::from(target));

        let options: Vec<(&str, &str)> = state
            .templates()
            .iter()
            .map(|t| (t.name, t.description))
            .collect();

        let mut lines = vec![
            subtitle_line(&format!("Select a template  →  {}", abs.display())),
            Line::default(),
        ];
        lines.extend(option_lines(&options, state.template_idx()));
        render_lines(frame, inner, lines);
    }

    fn render_setup_choice(&self, frame: &mut Frame, area: Rect, state: &InitState) {
        let inner = render_panel(frame, area, "Connection");
        let options = [
            ("No, I'll configure later", "Creates project with placeholder pgmi.yaml"),
            (
                "Yes, set up connection (recommended)",
                "Configure pgmi.yaml with your database settings",
            ),
        ];

        let mut lines = vec![
            subtitle_line("Configure database connection now?"),
            Line::default(),
        ];
        lines.extend(option_lines(&options, usize::from(state.setup_config())));
        render_lines(frame, inner, lines);
    }
}

impl Default for InitWizardComponent {
    fn default() -> Self {
        Self::new()
    }
}

fn muted(text: &str) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), Style::default().fg(MUTED_GRAY)))
}
