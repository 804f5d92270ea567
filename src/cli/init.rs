// ABOUTME: `pgmi-wizard init`: choose a project directory and template, optionally set up a connection

use anyhow::Result;
use std::sync::Arc;

use super::{connect, InitArgs, OutputFormat};
use crate::app::run_init_wizard;
use crate::components::connection_wizard::PgTester;
use crate::components::init_wizard::InitResult;
use crate::config::WizardConfig;

/// Execute the init command
pub async fn execute(args: InitArgs, config: &WizardConfig, format: OutputFormat) -> Result<()> {
    let dir = args.dir.as_ref().map(|d| d.to_string_lossy().into_owned());
    let result = run_init_wizard(Arc::new(PgTester), config, dir.as_deref()).await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)?;
            println!("{json}");
        }
        OutputFormat::Text => println!("{}", format_text(&result)),
    }
    Ok(())
}

pub fn format_text(result: &InitResult) -> String {
    if result.cancelled {
        return "Project setup cancelled.".to_string();
    }

    let mut text = format!(
        "Directory:       {}\nTemplate:        {}",
        result.target_dir, result.template
    );
    match &result.connection {
        Some(connection) => {
            text.push_str("\n\n");
            text.push_str(&connect::format_text(connection));
        }
        None => text.push_str("\nConnection:      configure later with `pgmi-wizard connect`"),
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConnectionResult;

    fn project() -> InitResult {
        InitResult {
            cancelled: false,
            target_dir: "/work/app".to_string(),
            template: "basic".to_string(),
            setup_config: false,
            connection: None,
        }
    }

    #[test]
    fn test_summary_without_connection() {
        let text = format_text(&project());
        assert!(text.contains("/work/app"));
        assert!(text.contains("basic"));
        assert!(text.contains("configure later"));
    }

    #[test]
    fn test_summary_includes_cancelled_connection() {
        let mut result = project();
        result.setup_config = true;
        result.connection = Some(ConnectionResult::cancelled());
        assert!(format_text(&result).contains("Connection setup cancelled."));
    }
}
