//! Line-driven session: each stdin line becomes one or more commands.

use locfinder_core::{AppConfig, BaseLayer};
use locfinder_ui::{Command, Geolocator, Key, Renderer, Session};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::host::start_session;
use crate::terminal::TerminalRenderer;

const HELP: &str = "\
commands:
  cp <code>          search by postal code
  here               search around the current location
  view <n>           focus result card n on the map
  close              close the results panel
  clear              reset the search
  theme light|dark   switch the base layer
  quit               exit";

#[derive(Debug, PartialEq)]
pub(crate) enum Input {
    Commands(Vec<Command>),
    Help,
    Quit,
}

/// Translate one input line. Unknown lines produce an error message.
pub(crate) fn parse_line(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    match word.to_ascii_lowercase().as_str() {
        "" => Ok(Input::Commands(Vec::new())),
        "cp" => Ok(Input::Commands(vec![
            Command::SetInput(rest.to_string()),
            Command::KeyPress(Key::Enter),
        ])),
        "here" => Ok(Input::Commands(vec![Command::UseCurrentLocation])),
        "view" => {
            let n: usize = rest
                .parse()
                .map_err(|_| format!("expected a card number, got {rest:?}"))?;
            if n == 0 {
                return Err("cards are numbered from 1".to_string());
            }
            Ok(Input::Commands(vec![Command::ViewOnMap(n - 1)]))
        }
        "close" => Ok(Input::Commands(vec![Command::ClosePanel])),
        "clear" => Ok(Input::Commands(vec![Command::Clear])),
        "theme" => {
            let layer: BaseLayer = rest.parse()?;
            Ok(Input::Commands(vec![Command::SelectBaseLayer(layer)]))
        }
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" => Ok(Input::Quit),
        other => Err(format!("unknown command {other:?}, type `help`")),
    }
}

pub(crate) async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let mut session = start_session(config, TerminalRenderer::default())?;
    println!("{HELP}");
    session.settle().await;

    let (input_tx, input_rx) = mpsc::unbounded_channel();
    tokio::spawn(read_stdin(input_tx));
    drive(&mut session, input_rx).await;
    tracing::debug!("interactive session ended");
    Ok(())
}

/// Forward parsed stdin lines in order. End of input counts as quit.
async fn read_stdin(inputs: mpsc::UnboundedSender<Input>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "failed to read stdin");
                break;
            }
        };
        match parse_line(&line) {
            Ok(input) => {
                let quit = input == Input::Quit;
                if inputs.send(input).is_err() || quit {
                    return;
                }
            }
            Err(message) => println!("? {message}"),
        }
    }
    let _ = inputs.send(Input::Quit);
}

/// Handle user input and session completions until quit, then let any
/// outstanding geolocation or panel timer finish.
///
/// User commands are handled in the order they were read; a quit only takes
/// effect after everything read before it.
pub(crate) async fn drive<G, R>(
    session: &mut Session<G, R>,
    mut inputs: mpsc::UnboundedReceiver<Input>,
) where
    G: Geolocator,
    R: Renderer,
{
    loop {
        tokio::select! {
            biased;
            input = inputs.recv() => match input {
                Some(Input::Commands(commands)) => {
                    for command in commands {
                        session.handle(command);
                    }
                }
                Some(Input::Help) => println!("{HELP}"),
                Some(Input::Quit) | None => break,
            },
            () = session.process_next() => {}
        }
    }
    session.settle().await;
}
