// ABOUTME: Project init wizard: target directory, template, and whether to set up a connection now

pub mod component;
pub mod state;

pub use component::InitWizardComponent;
pub use state::{
    check_dir_blocking, default_templates, InitError, InitResult, InitState, InitStep,
    TemplateInfo, MANAGED_INIT_FILES,
};
