//! A minimal line-oriented host around the engine.
//!
//! Entries print to stdout as `N: text`; the status line prints to stderr,
//! red when the last run failed. Each line read from standard input becomes
//! the new input text; a line of the form `=N` commits entry `N`; end of
//! input commits with no selection.

use anyhow::Result;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use cmdmenu::engine::Engine;

/// Drive the engine until a commit; returns the process exit code.
pub async fn run(mut engine: Engine) -> Result<i32> {
    engine.settle().await;
    render(&engine);

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Some(line) = input.next_line().await? else {
            // end of input: the user walked away without selecting anything
            let outcome = engine.commit(None).await?;
            return Ok(outcome.exit_code());
        };

        if let Some(selection) = line.strip_prefix('=') {
            match selection.trim().parse::<usize>() {
                Ok(index) if index < engine.entry_count() => {
                    let outcome = engine.commit(Some(index)).await?;
                    return Ok(outcome.exit_code());
                }
                _ => {
                    eprintln!("no such entry: {selection}");
                    continue;
                }
            }
        }

        engine.handle_input(&line);
        engine.settle().await;
        render(&engine);
    }
}

fn render(engine: &Engine) {
    for index in 0..engine.entry_count() {
        println!("{}: {}", index, engine.entry_text(index));
    }
    let status = engine.status_line();
    let text = status.text.trim_end();
    if !text.is_empty() {
        if status.is_error {
            eprintln!("{}", text.red());
        } else {
            eprintln!("{text}");
        }
    }
}
