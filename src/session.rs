//! Interactive sorting session.
//!
//! Reads one command per line and treats column names as header clicks,
//! printing the aggregate table after each one.

use crate::dataset::DatasetError;
use crate::models::SortKey;
use crate::report::generator::aggregate_table_markdown;
use crate::view::{TableDisplay, ViewEvent, ViewState};
use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

const HELP: &str = "\
Commands:
  year | totalJobs | averageSalary   click a column header
  show                               print the table again
  help                               show this help
  quit                               finish and write the report
";

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Click(SortKey),
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parse an input line; `None` for blank lines.
    pub fn parse(line: &str) -> Option<Result<Command, String>> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        Some(match line.to_lowercase().as_str() {
            "q" | "quit" | "exit" => Ok(Command::Quit),
            "h" | "help" | "?" => Ok(Command::Help),
            "show" | "ls" => Ok(Command::Show),
            _ => line.parse::<SortKey>().map(Command::Click),
        })
    }
}

/// Run the session until `quit` or end of input, returning the final state.
pub async fn run_session<R, W>(
    mut state: ViewState,
    input: R,
    mut output: W,
) -> Result<ViewState>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_table(&state, &mut output).await?;
    output.write_all(b"Type a column name to sort, 'help' for commands.\n").await?;
    output.flush().await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            None => continue,
            Some(Ok(command)) => command,
            Some(Err(message)) => {
                output.write_all(format!("{}\n", message).as_bytes()).await?;
                output.flush().await?;
                continue;
            }
        };
        debug!("Session command: {:?}", command);

        match command {
            Command::Quit => break,
            Command::Help => output.write_all(HELP.as_bytes()).await?,
            Command::Show => write_table(&state, &mut output).await?,
            Command::Click(key) => {
                state = click(state, key)?;
                write_table(&state, &mut output).await?;
            }
        }
        output.flush().await?;
    }

    Ok(state)
}

fn click(state: ViewState, key: SortKey) -> Result<ViewState, DatasetError> {
    state.apply(ViewEvent::HeaderClicked(key))
}

async fn write_table<W: AsyncWrite + Unpin>(state: &ViewState, output: &mut W) -> Result<()> {
    let text = match state.aggregate_display() {
        TableDisplay::Empty => "(no data)\n".to_string(),
        TableDisplay::Populated => {
            format!("\n{}\n", aggregate_table_markdown(&state.rows, state.sort))
        }
    };
    output.write_all(text.as_bytes()).await?;
    Ok(())
}
