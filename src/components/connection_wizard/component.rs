// ABOUTME: Renders the connection wizard as a pure function of WizardState
// One panel per step inside the shared header/footer shell

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    Frame,
};

use super::catalog::PROVIDERS;
use super::forms::FormVariant;
use super::state::{ProbeStatus, ProbeOutcome, WizardState, WizardStep};
use crate::components::form_view::{
    error_line, group_lines, help_line, option_lines, render_lines, render_panel, render_shell,
    subtitle_line, CORNFLOWER_BLUE, ERROR_RED, GOLD, MUTED_GRAY, SELECTION_GREEN, SOFT_WHITE,
};

pub const TITLE: &str = "pgmi - Connection Setup";

/// The connection wizard view
pub struct ConnectionWizardComponent;

impl ConnectionWizardComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let content = render_shell(frame, area, TITLE, self.help(state));

        match state.step() {
            WizardStep::SelectProvider => self.render_provider_selection(frame, content, state),
            WizardStep::SelectAuth => self.render_auth_selection(frame, content, state),
            WizardStep::InputForm(variant) => self.render_form(frame, content, state, variant),
            WizardStep::TestConnection | WizardStep::Done => {
                self.render_test_connection(frame, content, state);
            }
        }
    }

    fn render_provider_selection(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let inner = render_panel(frame, area, "Provider");
        let options: Vec<(&str, &str)> = PROVIDERS.iter().map(|p| (p.name, p.description)).collect();

        let mut lines = vec![subtitle_line("Where is your PostgreSQL server?"), Line::default()];
        lines.extend(option_lines(&options, state.provider_cursor()));
        render_lines(frame, inner, lines);
    }

    fn render_auth_selection(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let inner = render_panel(frame, area, "Authentication");
        let Some(provider) = state.provider() else {
            return;
        };
        let options: Vec<(&str, &str)> = provider
            .auth_options
            .iter()
            .map(|a| (a.name, a.description))
            .collect();

        let mut lines = vec![
            subtitle_line(&format!("{} - Authentication", provider.name)),
            Line::default(),
        ];
        lines.extend(option_lines(&options, state.auth_cursor()));
        render_lines(frame, inner, lines);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect, state: &WizardState, variant: FormVariant) {
        let inner = render_panel(frame, area, "Connection");

        let mut lines = vec![subtitle_line(variant.subtitle()), Line::default()];
        lines.extend(group_lines(state.inputs(), state.cursor_visible()));

        let notes = variant.notes();
        if !notes.is_empty() {
            lines.push(Line::default());
            lines.extend(
                notes
                    .iter()
                    .map(|note| Line::from(Span::styled(*note, Style::default().fg(MUTED_GRAY)))),
            );
        }

        if let Some(err) = state.validation_error() {
            lines.push(Line::default());
            lines.push(error_line(&err.to_string()));
        }

        render_lines(frame, inner, lines);
    }

    fn render_test_connection(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let inner = render_panel(frame, area, "Testing Connection");
        let config = &state.result().config;

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Target: ", Style::default().fg(MUTED_GRAY)),
                Span::styled(config.target_label(), Style::default().fg(SOFT_WHITE)),
            ]),
            Line::default(),
        ];

        match state.probe() {
            ProbeStatus::Running => lines.push(Line::from(vec![
                Span::styled(state.spinner(), Style::default().fg(CORNFLOWER_BLUE)),
                Span::styled(" Connecting...", Style::default().fg(SOFT_WHITE)),
            ])),
            ProbeStatus::Finished(ProbeOutcome::Connected { info }) => {
                lines.push(Line::from(Span::styled(
                    "✓ Connected successfully",
                    Style::default().fg(SELECTION_GREEN).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(info.clone(), Style::default().fg(MUTED_GRAY))));
            }
            ProbeStatus::Finished(ProbeOutcome::Failed { error }) => {
                lines.push(Line::from(Span::styled(
                    "✗ Connection failed",
                    Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(MUTED_GRAY))));
            }
            ProbeStatus::Idle => {
                lines.push(Line::from(Span::styled("Done", Style::default().fg(GOLD))));
            }
        }

        render_lines(frame, inner, lines);
    }

    fn help(&self, state: &WizardState) -> Line<'static> {
        match state.step() {
            WizardStep::SelectProvider => {
                help_line(&[("↑/↓", "navigate"), ("enter", "select"), ("q", "quit")])
            }
            WizardStep::SelectAuth => {
                help_line(&[("↑/↓", "navigate"), ("enter", "select"), ("esc", "back")])
            }
            WizardStep::InputForm(FormVariant::ConnectionString) => {
                help_line(&[("enter", "submit"), ("esc", "back")])
            }
            WizardStep::InputForm(_) => help_line(&[
                ("tab/↓", "next"),
                ("shift+tab/↑", "prev"),
                ("enter", "submit"),
                ("esc", "back"),
            ]),
            WizardStep::TestConnection => match state.test_ok() {
                None => help_line(&[("ctrl+c", "quit")]),
                Some(true) => help_line(&[("enter", "continue"), ("esc", "go back")]),
                Some(false) => help_line(&[("enter", "try again"), ("esc", "go back")]),
            },
            WizardStep::Done => Line::default(),
        }
    }
}

impl Default for ConnectionWizardComponent {
    fn default() -> Self {
        Self::new()
    }
}
