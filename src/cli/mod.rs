//! Command-line interface for the cmdmenu reference host.

pub mod host;

use clap::Parser;
use std::path::PathBuf;

use cmdmenu::config::Config;

/// cmdmenu - drive a selectable list from a shell command
#[derive(Parser, Debug, Clone)]
#[command(name = "cmdmenu")]
#[command(version)]
#[command(about = "Drive a selectable list from a shell command", long_about = None)]
pub struct Cli {
    /// Command template producing the list entries; %s receives the input
    /// text, no %s pipes the input to stdin
    #[arg(short = 'c', long = "command", env = "CMDMENU_COMMAND")]
    pub list_command: Option<String>,

    /// Command template the committed selection is fed into, same directive
    /// rules
    #[arg(short = 'r', long = "result", env = "CMDMENU_RESULT")]
    pub result_command: Option<String>,

    /// Shell binary used to interpret both commands
    #[arg(long)]
    pub shell: Option<String>,

    /// Working directory for launched commands
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(long, env = "CMDMENU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(list_command) = &self.list_command {
            config.list_command = list_command.clone();
        }
        if let Some(result_command) = &self.result_command {
            config.result_command = result_command.clone();
        }
        if let Some(shell) = &self.shell {
            config.shell = shell.clone();
        }
        if let Some(cwd) = &self.cwd {
            config.cwd = Some(cwd.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::parse_from(["cmdmenu", "-c", "ls %s", "--shell", "bash"]);
        let config = cli.apply(Config::default());
        assert_eq!(config.list_command, "ls %s");
        assert_eq!(config.shell, "bash");
        // untouched values keep the config's
        assert_eq!(config.result_command, "cat");
    }

    #[test]
    fn verbosity_accumulates() {
        let cli = Cli::parse_from(["cmdmenu", "-vvv"]);
        assert_eq!(cli.verbose, 3);
    }
}
