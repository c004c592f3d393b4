//! Dispatching a committed selection into the result command.
//!
//! Dispatch is the one deliberately blocking operation: it represents a
//! terminal user action, so the engine waits for the result command to exit
//! and translates its status into how the engine itself should terminate.

use tracing::debug;

use crate::error::Result;
use crate::runner::{self, Shell};
use crate::template::CommandTemplate;

/// How the engine terminates after a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The result command succeeded (or there was nothing to run); the host
    /// should simply close.
    Exit,
    /// The result command exited non-zero; the process should terminate
    /// with that same status so the failure propagates to the caller.
    Terminate(i32),
}

impl Outcome {
    /// The process exit code this outcome maps to.
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Exit => 0,
            Outcome::Terminate(status) => status,
        }
    }
}

/// Run the result command against a payload and wait for it to exit.
///
/// Templates without a directive get the payload piped to standard input;
/// templates with one get it substituted into the command line and nothing
/// on standard input. The result command's own output goes straight to the
/// user, not into the engine.
pub async fn dispatch(template: &CommandTemplate, payload: &[u8], shell: &Shell) -> Result<Outcome> {
    let status = if template.uses_stdin() {
        debug!(command = template.text(), "dispatching payload on stdin");
        runner::run_passthrough(shell, template.text(), Some(payload)).await?
    } else {
        let command = template.resolve(&String::from_utf8_lossy(payload));
        debug!(command = %command, "dispatching substituted command");
        runner::run_passthrough(shell, &command, None).await?
    };
    if status == 0 {
        Ok(Outcome::Exit)
    } else {
        Ok(Outcome::Terminate(status))
    }
}
