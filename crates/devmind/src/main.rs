//! Interactive terminal front end of the DevMind chatbot.

#[macro_use]
extern crate tracing;

use std::io::{IsTerminal, Write as _};
use std::pin::pin;
use std::process::ExitCode;
use std::time::Duration;

use devmind::command::{Command, Input};
use devmind::render::Renderer;
use devmind::{Settings, build_session};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::select;
use tokio::time::sleep;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A missing `.env` file is fine, the variables may come from the shell.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    if settings.api_key.is_none() {
        debug!("no API key configured, requests will fail");
    }

    let color = std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();
    let renderer = Renderer::new(color);
    let mut session = build_session(&settings);
    let mut lines = BufReader::new(io::stdin()).lines();

    println!("{}", renderer.banner(&settings.model));

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut lines).await else {
            break;
        };

        let text = match Input::parse(&line) {
            Input::Empty => continue,
            Input::Command(Command::Quit) => break,
            Input::Command(Command::Tips) => {
                print!("{}", renderer.tips());
                continue;
            }
            Input::Command(Command::Capabilities) => {
                print!("{}", renderer.capabilities(session.capabilities()));
                continue;
            }
            Input::Command(Command::History) => {
                for turn in session.transcript().all() {
                    print!("{}", renderer.turn(turn));
                }
                continue;
            }
            Input::Command(Command::Reset) => {
                session.restart();
                println!("Started a new conversation.");
                continue;
            }
            Input::Command(Command::Help) => {
                print!("{}", renderer.help());
                continue;
            }
            Input::UnknownCommand(name) => {
                println!("Unknown command /{name}, type /help for the list.");
                continue;
            }
            Input::Message(text) => text,
        };

        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(progress_style.clone());
        progress_bar.set_message("Processing");

        let (output, answered) = {
            let mut cycle = pin!(session.on_user_input(text));
            let result = loop {
                select! {
                    result = &mut cycle => break result,
                    _ = sleep(Duration::from_millis(100)) => progress_bar.inc(1),
                }
            };

            // Finish the progress bar before printing anything else.
            progress_bar.finish_and_clear();

            match result {
                Ok(resp) => (renderer.response(resp), true),
                // The question stays in the transcript without an answer.
                Err(err) => (renderer.error(&err), false),
            }
        };
        print!("{output}");
        if answered && session.is_last_response_truncated() {
            print!("{}", renderer.truncation_notice());
        }
        println!();
    }

    ExitCode::SUCCESS
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    match lines.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
