// ABOUTME: State for the project init wizard: target directory, template, and connection setup choice
// Directory input uses tab completion and refuses directories holding unmanaged files

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::components::connection_wizard::WizardMsg;
use crate::components::path_completer::PathCompleter;
use crate::components::text_field::TextField;
use crate::models::ConnectionResult;

/// Files pgmi creates itself; they never block init
pub const MANAGED_INIT_FILES: [&str; 2] = ["pgmi.yaml", ".env"];

/// Long enough for any path the completer can produce
const PATH_CHAR_LIMIT: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStep {
    Directory,
    Template,
    SetupChoice,
}

/// Project template offered by the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    pub name: &'static str,
    pub description: &'static str,
}

pub fn default_templates() -> Vec<TemplateInfo> {
    vec![
        TemplateInfo {
            name: "basic",
            description: "Simple migrations with sequential execution",
        },
        TemplateInfo {
            name: "advanced",
            description: "Production-ready with metadata-driven deployment",
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("Directory is not empty: '{}' contains: {}", .path.display(), .entries.join(", "))]
    DirectoryNotEmpty { path: PathBuf, entries: Vec<String> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitResult {
    pub cancelled: bool,
    pub target_dir: String,
    pub template: String,
    pub setup_config: bool,
    /// Filled when the user chose to configure the connection right away
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionResult>,
}

/// Entries of `dir` that are not managed by pgmi, sorted. A missing directory blocks nothing.
pub fn check_dir_blocking(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut blocking: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !MANAGED_INIT_FILES.contains(&name.as_str()))
        .collect();
    blocking.sort();
    blocking
}

#[derive(Debug, Clone)]
pub struct InitState {
    step: InitStep,
    dir_input: TextField,
    dir_error: Option<InitError>,
    completer: PathCompleter,
    templates: Vec<TemplateInfo>,
    template_idx: usize,
    setup_config: bool,
    cursor_visible: bool,
    done: bool,
    result: InitResult,
}

impl InitState {
    /// `target_dir` pre-fills the directory step; it is still shown for confirmation
    pub fn new(target_dir: Option<&str>, templates: Vec<TemplateInfo>, dirs_only: bool) -> Self {
        let mut dir_input = TextField::new("Directory:")
            .with_placeholder(".")
            .with_char_limit(PATH_CHAR_LIMIT);
        if let Some(dir) = target_dir {
            dir_input.set_value(dir);
        }
        dir_input.focus();

        Self {
            step: InitStep::Directory,
            dir_input,
            dir_error: None,
            completer: PathCompleter::new(dirs_only),
            templates,
            template_idx: 0,
            setup_config: false,
            cursor_visible: true,
            done: false,
            result: InitResult::default(),
        }
    }

    pub fn step(&self) -> InitStep {
        self.step
    }

    pub fn dir_input(&self) -> &TextField {
        &self.dir_input
    }

    pub fn dir_error(&self) -> Option<&InitError> {
        self.dir_error.as_ref()
    }

    pub fn templates(&self) -> &[TemplateInfo] {
        &self.templates
    }

    pub fn template_idx(&self) -> usize {
        self.template_idx
    }

    pub fn setup_config(&self) -> bool {
        self.setup_config
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn result(&self) -> &InitResult {
        &self.result
    }

    pub fn into_result(self) -> InitResult {
        self.result
    }

    /// Directory the user typed, `.` when left empty
    pub fn resolved_dir(&self) -> String {
        if self.dir_input.is_empty() {
            ".".to_string()
        } else {
            self.dir_input.value().to_string()
        }
    }

    /// Apply one message. Returns true when the wizard is finished.
    pub fn handle(&mut self, msg: WizardMsg) -> bool {
        match msg {
            WizardMsg::Key(key) => self.handle_key(key),
            WizardMsg::Tick => {
                if self.step == InitStep::Directory {
                    self.cursor_visible = !self.cursor_visible;
                }
            }
            WizardMsg::Resize(..) | WizardMsg::ProbeFinished(_) => {}
        }
        self.done
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.cancel();
            return;
        }

        match self.step {
            InitStep::Directory => self.update_directory(key),
            InitStep::Template => self.update_template(key),
            InitStep::SetupChoice => self.update_setup_choice(key),
        }
    }

    fn update_directory(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let dir = self.resolved_dir();
                let blocking = check_dir_blocking(Path::new(&dir));
                if !blocking.is_empty() {
                    let path = fs::canonicalize(&dir).unwrap_or_else(|_| PathBuf::from(&dir));
                    debug!(dir = %path.display(), count = blocking.len(), "Directory has blocking entries");
                    self.dir_error = Some(InitError::DirectoryNotEmpty {
                        path,
                        entries: blocking,
                    });
                    return;
                }

                info!(dir = %dir, "Target directory accepted");
                self.dir_error = None;
                self.result.target_dir = dir;
                self.step = InitStep::Template;
            }
            KeyCode::Tab => {
                let current = self.dir_input.value().to_string();
                let completed = self.completer.next(&current);
                if completed != current {
                    self.dir_input.set_value(&completed);
                    self.dir_error = None;
                }
                self.cursor_visible = true;
            }
            KeyCode::Esc => self.cancel(),
            _ => {
                self.completer.reset();
                self.dir_error = None;
                self.cursor_visible = true;
                self.dir_input.handle_key(key);
            }
        }
    }

    fn update_template(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.template_idx = self.template_idx.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.template_idx + 1 < self.templates.len() {
                    self.template_idx += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(template) = self.templates.get(self.template_idx) {
                    info!(template = template.name, "Template selected");
                    self.result.template = template.name.to_string();
                    self.step = InitStep::SetupChoice;
                }
            }
            KeyCode::Esc => {
                self.step = InitStep::Directory;
                self.dir_input.focus();
                self.cursor_visible = true;
            }
            _ => {}
        }
    }

    fn update_setup_choice(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Char('k') | KeyCode::Char('j') => {
                self.setup_config = !self.setup_config;
            }
            KeyCode::Enter => {
                self.result.setup_config = self.setup_config;
                self.done = true;
                info!(setup_config = self.setup_config, "Init wizard finished");
            }
            KeyCode::Esc => self.step = InitStep::Template,
            _ => {}
        }
    }

    fn cancel(&mut self) {
        info!(step = ?self.step, "Init wizard cancelled");
        self.result.cancelled = true;
        self.done = true;
    }
}
