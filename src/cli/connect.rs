// ABOUTME: `pgmi-wizard connect`: run the connection wizard and print the result
//
// JSON goes to stdout for tools that persist the connection; text is a human summary

use anyhow::Result;
use std::sync::Arc;

use super::OutputFormat;
use crate::app::run_connection_wizard;
use crate::components::connection_wizard::PgTester;
use crate::config::WizardConfig;
use crate::models::ConnectionResult;

/// Execute the connect command
pub async fn execute(config: &WizardConfig, format: OutputFormat) -> Result<()> {
    let result = run_connection_wizard(Arc::new(PgTester), config).await?;

    match format {
        OutputFormat::Json => output_json(&result)?,
        OutputFormat::Text => println!("{}", format_text(&result)),
    }
    Ok(())
}

fn output_json(result: &ConnectionResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

/// Human-readable summary; the password is never shown
pub fn format_text(result: &ConnectionResult) -> String {
    if result.cancelled {
        return "Connection setup cancelled.".to_string();
    }

    let config = &result.config;
    let mut lines = vec![
        format!("Target:          {}", config.target_label()),
        format!("Authentication:  {}", config.auth_method),
    ];
    if !config.username.is_empty() {
        lines.push(format!("Username:        {}", config.username));
    }
    if !config.ssl_mode.is_empty() {
        lines.push(format!("SSL mode:        {}", config.ssl_mode));
    }
    if !config.aws_region.is_empty() {
        lines.push(format!("AWS region:      {}", config.aws_region));
    }
    if !config.google_instance.is_empty() {
        lines.push(format!("Cloud SQL:       {}", config.google_instance));
    }
    lines.push(format!(
        "Tested:          {}",
        if result.tested { "yes" } else { "no" }
    ));
    lines.join("\n")
}
