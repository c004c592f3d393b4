//! Configuration for the engine.
//!
//! Values come from three layers: built-in defaults, an optional TOML file,
//! and command-line overrides applied by the binary. The defaults make the
//! engine echo its input back as the only entry and pass the selection
//! through unchanged.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::runner::Shell;

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template for the command whose output becomes the selectable entries.
    /// A `%s` directive receives the input text; without one the input is
    /// piped to the command's standard input.
    pub list_command: String,

    /// Template for the command the committed selection is fed into, with
    /// the same directive rules.
    pub result_command: String,

    /// Shell binary used to interpret both command lines.
    pub shell: String,

    /// Working directory for launched commands.
    pub cwd: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            list_command: "echo %s".to_string(),
            result_command: "cat".to_string(),
            shell: "sh".to_string(),
            cwd: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The shell settings launched commands run under.
    pub fn shell_options(&self) -> Shell {
        let mut shell = Shell::new(&self.shell);
        if let Some(cwd) = &self.cwd {
            shell = shell.with_cwd(cwd);
        }
        shell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults_echo_and_pass_through() {
        let config = Config::default();
        assert_eq!(config.list_command, "echo %s");
        assert_eq!(config.result_command, "cat");
        assert_eq!(config.shell, "sh");
        assert_eq!(config.cwd, None);
    }

    #[test]
    fn load_merges_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "list_command = \"ls %s\"").unwrap();
        writeln!(file, "cwd = \"/tmp\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.list_command, "ls %s");
        assert_eq!(config.cwd, Some(PathBuf::from("/tmp")));
        // untouched keys keep their defaults
        assert_eq!(config.result_command, "cat");
        assert_eq!(config.shell, "sh");
    }

    #[test]
    fn load_reports_missing_files() {
        let err = Config::load(Path::new("/nonexistent/cmdmenu.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn load_reports_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "list_command = [not toml").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }
}
