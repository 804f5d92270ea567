// ABOUTME: CLI argument parsing and command routing for pgmi-wizard
//
// connect: interactive connection setup (default when no command is given)
// init: project directory and template selection, optionally followed by connect

pub mod connect;
pub mod init;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Interactive setup for pgmi PostgreSQL connections and projects
#[derive(Parser)]
#[command(name = "pgmi-wizard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: ~/.pgmi/wizard.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Connection test timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format for the wizard result
    #[arg(long, global = true, default_value = "json")]
    pub format: OutputFormat,
}

/// Output format for wizard results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    #[default]
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure and test a database connection (default if no command given)
    Connect,

    /// Set up a new pgmi project directory
    Init(InitArgs),
}

#[derive(clap::Args)]
pub struct InitArgs {
    /// Target directory (prompted for when omitted)
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["pgmi-wizard"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.timeout.is_none());
    }

    #[test]
    fn test_init_with_dir_and_global_flags() {
        let cli = Cli::try_parse_from([
            "pgmi-wizard",
            "init",
            "myproject",
            "--timeout",
            "3",
            "--format",
            "text",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Init(args)) => assert_eq!(args.dir, Some(PathBuf::from("myproject"))),
            _ => panic!("expected init command"),
        }
        assert_eq!(cli.timeout, Some(3));
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        assert!(Cli::try_parse_from(["pgmi-wizard", "--timeout", "soon"]).is_err());
    }
}
