//! Flowchat CLI entry point: a line REPL over one chat session.

use std::io::{self, BufRead, Write};

use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use flowchat::cli_output;
use flowchat::client::{ChatClient, DEFAULT_BASE_URL};
use flowchat::session::{SessionController, SessionError, TurnOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let base_url =
        std::env::var("FLOWCHAT_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    tracing::info!(%base_url, "starting flowchat");

    let client = ChatClient::with_base_url(base_url);
    let mut session = SessionController::new(client);

    cli_output::print_header("FLOWCHAT");
    cli_output::print_message(&session.store().messages()[0]);

    let stdin = io::stdin();
    loop {
        print!("you> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        match input {
            "exit" | "quit" => break,
            "/reset" => {
                session.reset();
                cli_output::print_message(&session.store().messages()[0]);
                continue;
            }
            _ => {}
        }

        match session.submit(input).await {
            Ok(outcome) => {
                if let Some(message) = session.store().messages().last() {
                    cli_output::print_message(message);
                }
                match outcome {
                    TurnOutcome::Completed => {}
                    TurnOutcome::Truncated => {
                        cli_output::print_error("stream ended before completion");
                    }
                    TurnOutcome::Failed => {
                        let detail = session.stream_error().unwrap_or("unknown error");
                        cli_output::print_error(detail);
                    }
                }
            }
            Err(SessionError::EmptyInput) => continue,
            Err(SessionError::Busy) => {
                cli_output::print_error("wait for the current response to finish");
            }
        }
    }

    Ok(())
}
