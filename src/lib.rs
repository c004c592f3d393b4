//! # cmdmenu - a shell-command-backed dynamic menu engine
//!
//! cmdmenu drives a selectable list whose entries come from a shell command.
//! It runs a configurable *list command*, presents each output line as an
//! entry, re-runs the command whenever the input text changes, and on commit
//! feeds the chosen entry (or the whole output) into a second *result
//! command* whose exit status becomes the engine's own.
//!
//! The surrounding menu host - whatever renders entries and handles
//! keystrokes - is not part of this crate; the engine only exposes the
//! contract such a host consumes. A minimal line-oriented reference host
//! ships as the `cmdmenu` binary.
//!
//! ## How payloads reach commands
//!
//! Both command templates may carry a single `%s`-style substitution
//! directive (`%%` is a literal percent). With a directive, the payload is
//! substituted into the command line; without one, it is piped to the
//! command's standard input. The list command's payload is the input text;
//! the result command's payload is the committed selection.
//!
//! ## Data flow
//!
//! ```text
//! input text ──► Engine ──► shell: list command ──► stdout/stderr/status
//!                  │                                       │
//!                  │            line index over stdout ◄───┘
//!                  ▼
//!        entries for the host      (entry 0 = the resolved command line,
//!                                   entries 1.. = output lines)
//!
//! commit(i) ──► shell: result command ◄── selected line or full output
//!                  │
//!                  ▼
//!        Outcome::Exit | Outcome::Terminate(status)
//! ```
//!
//! ## Quick example
//!
//! ```rust,ignore
//! use cmdmenu::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> cmdmenu::error::Result<()> {
//!     let config = Config {
//!         list_command: "grep -i %s /usr/share/dict/words".to_string(),
//!         ..Config::default()
//!     };
//!
//!     let mut engine = Engine::new(&config);
//!     engine.handle_input("rust");
//!     engine.settle().await;
//!
//!     for index in 0..engine.entry_count() {
//!         println!("{}: {}", index, engine.entry_text(index));
//!     }
//!
//!     match engine.commit(Some(1)).await? {
//!         Outcome::Exit => Ok(()),
//!         Outcome::Terminate(status) => std::process::exit(status),
//!     }
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod prelude {
    //! Convenient re-exports of the commonly used types.

    pub use crate::config::Config;
    pub use crate::dispatch::Outcome;
    pub use crate::engine::{Engine, StatusLine};
    pub use crate::error::{Error, Result};
    pub use crate::lines::LineIndex;
    pub use crate::runner::{RunOutput, Shell};
    pub use crate::template::CommandTemplate;
}

/// Error types and the crate-wide `Result` alias.
pub mod error;

/// Layered configuration with TOML file loading.
pub mod config;

/// Command templates and the substitution directive scan.
pub mod template;

/// Line index over captured output buffers.
pub mod lines;

/// Asynchronous shell command execution.
pub mod runner;

/// The reactive list engine and its host-facing surface.
pub mod engine;

/// Result-command dispatch and termination outcomes.
pub mod dispatch;
