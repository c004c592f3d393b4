//! The reactive list engine.
//!
//! The engine owns the two command templates and the state of the most
//! recent run. It launches the list command whenever the input text changes,
//! never blocking the caller: each launch runs on a spawned task and reports
//! back over a channel, and the engine folds completions into its state when
//! the host asks it to. On commit it feeds the selected entry into the
//! result command and maps that command's exit status to a termination
//! outcome.
//!
//! Overlapping runs are allowed: changing the input while a run is in flight
//! launches a new run without cancelling the old one. Every launch is tagged
//! with a monotonically increasing sequence number and a completion is only
//! applied if it is newer than everything applied so far, so a slow stale
//! run can never overwrite the result of the latest input.

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::dispatch::{self, Outcome};
use crate::error::Result;
use crate::lines::LineIndex;
use crate::runner::{self, RunOutput, Shell};
use crate::template::CommandTemplate;

/// Status line for the host to display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    /// Text to show, normally the list command's captured stderr.
    pub text: String,
    /// Whether the host should render it as an error.
    pub is_error: bool,
}

/// Everything one completed list run produced, replaced as a unit.
#[derive(Debug, Clone)]
struct CompletedRun {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    status: i32,
    lines: LineIndex,
}

/// State of the most recent launch and completion.
///
/// `last_input` and `command` are updated at launch time, which is what lets
/// the engine detect "input unchanged since last launch" while a run is
/// still in flight. `output` is only ever replaced by an applied completion.
#[derive(Debug, Default)]
struct RunState {
    last_input: String,
    command: String,
    failure: Option<String>,
    output: Option<CompletedRun>,
}

struct Completion {
    seq: u64,
    result: Result<RunOutput>,
}

/// The engine's public face to a menu host.
///
/// Entry 0 always displays the resolved command line itself and selects the
/// full captured stdout; entries `1..` are the individual output lines.
pub struct Engine {
    list: CommandTemplate,
    result: CommandTemplate,
    shell: Shell,
    state: RunState,
    launched: u64,
    applied: u64,
    received: u64,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl Engine {
    /// Build an engine and launch the initial run with an empty input, so
    /// the list is populated before the host shows anything.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: &Config) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut engine = Self {
            list: CommandTemplate::new(&config.list_command),
            result: CommandTemplate::new(&config.result_command),
            shell: config.shell_options(),
            state: RunState::default(),
            launched: 0,
            applied: 0,
            received: 0,
            tx,
            rx,
        };
        engine.launch("");
        engine
    }

    /// Notify the engine of new input text; returns the input unchanged.
    ///
    /// Input identical to the most recent launch is a no-op: the run for it
    /// is already in flight or completed. Anything else launches a new list
    /// run without blocking and without cancelling an in-flight one.
    pub fn handle_input(&mut self, input: &str) -> String {
        if input == self.state.last_input {
            return input.to_string();
        }
        debug!(input, "input changed, relaunching list command");
        self.launch(input);
        input.to_string()
    }

    fn launch(&mut self, input: &str) {
        self.state.last_input = input.to_string();
        let payload = if self.list.uses_stdin() {
            self.state.command = self.list.text().to_string();
            Some(input.as_bytes().to_vec())
        } else {
            self.state.command = self.list.resolve(input);
            None
        };
        self.launched += 1;
        let seq = self.launched;
        let command = self.state.command.clone();
        let shell = self.shell.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = runner::run(&shell, &command, payload.as_deref()).await;
            // the engine may be gone by the time a run finishes
            let _ = tx.send(Completion { seq, result });
        });
    }

    /// Whether any launched run has not reported back yet.
    pub fn has_pending_runs(&self) -> bool {
        self.received < self.launched
    }

    /// Fold any already-delivered completions into the state without
    /// blocking. Returns whether the visible state changed, i.e. whether the
    /// host should refresh its rendering.
    pub fn process_completions(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.rx.try_recv() {
            changed |= self.apply(completion);
        }
        changed
    }

    /// Wait for the next completion, then fold in everything delivered.
    ///
    /// Only meaningful while [`has_pending_runs`](Self::has_pending_runs)
    /// is true; with nothing in flight this pends forever.
    pub async fn next_completion(&mut self) -> bool {
        match self.rx.recv().await {
            Some(completion) => {
                let mut changed = self.apply(completion);
                changed |= self.process_completions();
                changed
            }
            None => false,
        }
    }

    /// Wait until every launched run has reported back.
    pub async fn settle(&mut self) -> bool {
        let mut changed = false;
        while self.has_pending_runs() {
            changed |= self.next_completion().await;
        }
        changed
    }

    fn apply(&mut self, completion: Completion) -> bool {
        self.received += 1;
        if completion.seq <= self.applied {
            trace!(seq = completion.seq, "discarding superseded completion");
            return false;
        }
        self.applied = completion.seq;
        match completion.result {
            Ok(output) => {
                trace!(seq = completion.seq, status = output.status, "applying run output");
                let lines = LineIndex::build(&output.stdout);
                self.state.failure = None;
                self.state.output = Some(CompletedRun {
                    lines,
                    stdout: output.stdout,
                    stderr: output.stderr,
                    status: output.status,
                });
            }
            Err(error) => {
                // the run is lost, but prior results stay visible and the
                // failure is surfaced on the status line
                warn!(%error, "list command failed");
                self.state.failure = Some(error.to_string());
            }
        }
        true
    }

    /// Number of selectable entries: the synthetic full-output entry plus
    /// one per output line of the most recent completed run.
    pub fn entry_count(&self) -> usize {
        1 + self.state.output.as_ref().map_or(0, |run| run.lines.count())
    }

    /// Display text for entry `index`.
    ///
    /// Entry 0 shows the resolved command line actually run; entries `1..`
    /// show the output lines. `index` must be below
    /// [`entry_count`](Self::entry_count).
    pub fn entry_text(&self, index: usize) -> String {
        if index == 0 {
            return self.state.command.clone();
        }
        let run = self
            .state
            .output
            .as_ref()
            .unwrap_or_else(|| panic!("entry {index} requested before any run completed"));
        String::from_utf8_lossy(run.lines.slice(&run.stdout, index - 1)).into_owned()
    }

    /// The status line: the most recent run's stderr, flagged as an error
    /// when that run exited non-zero or failed to execute at all.
    pub fn status_line(&self) -> StatusLine {
        if let Some(failure) = &self.state.failure {
            return StatusLine {
                text: failure.clone(),
                is_error: true,
            };
        }
        match &self.state.output {
            Some(run) => StatusLine {
                text: String::from_utf8_lossy(&run.stderr).into_owned(),
                is_error: run.status != 0,
            },
            None => StatusLine::default(),
        }
    }

    /// Every entry matches every input; filtering is the host's concern.
    pub fn entry_matches(&self, _index: usize) -> bool {
        true
    }

    /// Commit a selection, feeding it into the result command and waiting
    /// for that command to exit.
    ///
    /// No selection, or no completed output to select from, is a plain
    /// [`Outcome::Exit`]. Entry 0 selects the full captured stdout; entry
    /// `i >= 1` selects line `i - 1` without its terminator.
    pub async fn commit(&self, selection: Option<usize>) -> Result<Outcome> {
        let Some(run) = &self.state.output else {
            return Ok(Outcome::Exit);
        };
        let Some(index) = selection else {
            return Ok(Outcome::Exit);
        };
        let payload = if index == 0 {
            run.stdout.as_slice()
        } else {
            run.lines.slice(&run.stdout, index - 1)
        };
        dispatch::dispatch(&self.result, payload, &self.shell).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(list: &str, result: &str) -> Config {
        Config {
            list_command: list.to_string(),
            result_command: result.to_string(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn initial_run_populates_the_list() {
        let mut engine = Engine::new(&config("printf 'a\\nb\\nc'", "cat"));
        engine.settle().await;
        assert_eq!(engine.entry_count(), 4);
        assert_eq!(engine.entry_text(1), "a");
        assert_eq!(engine.entry_text(2), "b");
        assert_eq!(engine.entry_text(3), "c");
    }

    #[tokio::test]
    async fn before_any_completion_only_the_header_exists() {
        let engine = Engine::new(&config("echo hi", "cat"));
        assert_eq!(engine.entry_count(), 1);
        assert_eq!(engine.entry_text(0), "echo hi");
        assert_eq!(engine.status_line(), StatusLine::default());
    }

    #[tokio::test]
    async fn substitution_templates_resolve_the_input() {
        let mut engine = Engine::new(&config("echo %s", "cat"));
        engine.handle_input("hi");
        engine.settle().await;
        assert_eq!(engine.entry_text(0), "echo hi");
        assert_eq!(engine.entry_count(), 2);
        assert_eq!(engine.entry_text(1), "hi");
    }

    #[tokio::test]
    async fn stdin_templates_receive_the_input_as_payload() {
        let mut engine = Engine::new(&config("tr a-z A-Z", "cat"));
        engine.handle_input("hello");
        engine.settle().await;
        assert_eq!(engine.entry_text(0), "tr a-z A-Z");
        assert_eq!(engine.entry_text(1), "HELLO");
    }

    #[tokio::test]
    async fn unchanged_input_launches_no_new_run() {
        let mut engine = Engine::new(&config("echo %s", "cat"));
        engine.handle_input("same");
        engine.settle().await;
        let echoed = engine.handle_input("same");
        assert_eq!(echoed, "same");
        assert!(!engine.has_pending_runs());
    }

    #[tokio::test]
    async fn the_initial_empty_input_is_already_launched() {
        let mut engine = Engine::new(&config("echo %s", "cat"));
        engine.handle_input("");
        assert_eq!(engine.launched, 1);
        engine.settle().await;
    }

    #[tokio::test]
    async fn changed_input_always_relaunches() {
        let mut engine = Engine::new(&config("echo %s", "cat"));
        engine.handle_input("x");
        engine.handle_input("y");
        assert_eq!(engine.launched, 3);
        engine.settle().await;
        assert_eq!(engine.entry_text(1), "y");
    }

    #[tokio::test]
    async fn a_slow_stale_run_cannot_overwrite_a_newer_one() {
        // the input carries both a delay and a tag: "<delay>:<tag>"
        let mut engine = Engine::new(&config("x=%s; sleep \"${x%%:*}\"; echo \"${x#*:}\"", "cat"));
        engine.handle_input("0.4:slow");
        engine.handle_input("0.0:fast");
        engine.settle().await;
        assert_eq!(engine.entry_text(1), "fast");
    }

    #[tokio::test]
    async fn nonzero_exit_flags_the_status_line() {
        let mut engine = Engine::new(&config("echo out; echo err >&2; exit 3", "cat"));
        engine.settle().await;
        let status = engine.status_line();
        assert!(status.is_error);
        assert_eq!(status.text, "err\n");
        // the list is still populated from whatever stdout was produced
        assert_eq!(engine.entry_text(1), "out");
    }

    #[tokio::test]
    async fn failed_launches_keep_prior_results_visible() {
        let mut engine = Engine::new(&config("echo stays", "cat"));
        engine.settle().await;
        assert_eq!(engine.entry_text(1), "stays");

        engine.shell = Shell::new("/nonexistent/shell-for-tests");
        engine.handle_input("anything");
        engine.settle().await;

        let status = engine.status_line();
        assert!(status.is_error);
        assert!(status.text.contains("failed to start"));
        assert_eq!(engine.entry_text(1), "stays");
    }

    #[tokio::test]
    async fn every_entry_matches() {
        let mut engine = Engine::new(&config("printf 'a\\nb'", "cat"));
        engine.settle().await;
        assert!((0..engine.entry_count()).all(|i| engine.entry_matches(i)));
    }

    #[tokio::test]
    async fn commit_without_selection_exits() {
        let mut engine = Engine::new(&config("echo hi", "cat"));
        engine.settle().await;
        assert_eq!(engine.commit(None).await.unwrap(), Outcome::Exit);
    }

    #[tokio::test]
    async fn commit_before_any_output_exits() {
        let engine = Engine::new(&config("echo hi", "cat"));
        assert_eq!(engine.commit(Some(1)).await.unwrap(), Outcome::Exit);
    }
}
