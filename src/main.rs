// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and build the shared HTTP client
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with a code that says how it went:
//      0   = links listed
//      1   = the fetch failed (network, timeout, HTTP status)
//      2   = bad input or internal error
//      130 = cancelled with Ctrl-C
// =============================================================================

mod cli;
mod logging;
mod output;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use cli::{Cli, Commands};
use link_harvest::{extract, harvest, normalize_input, FetchError, Fetcher, Session};

const EXIT_OK: i32 = 0;
const EXIT_FETCH_FAILED: i32 = 1;
const EXIT_ERROR: i32 = 2;
const EXIT_CANCELLED: i32 = 130;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    // One client for the whole process; every operation shares it
    let fetcher = Fetcher::new(&cli.fetch_config()).context("failed to build HTTP client")?;

    match cli.command {
        Commands::Fetch { input, json, html } => handle_fetch(&fetcher, &input, json, html).await,
        Commands::Extract { file, base, json } => handle_extract(&file, &base, json),
        Commands::Interactive { json } => handle_interactive(fetcher, json).await,
    }
}

// Handles the 'fetch' subcommand
async fn handle_fetch(fetcher: &Fetcher, input: &str, json: bool, show_html: bool) -> Result<i32> {
    let url = match normalize_input(input) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    if !json {
        eprintln!("🔍 Fetching {}", url);
    }

    // Ctrl-C raises the cancel signal instead of killing the process
    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    match harvest(fetcher, &url, &cancel).await {
        Ok(page) => {
            let html = show_html.then_some(page.html.as_str());
            println!("{}", output::render_links(&page.url, &page.links, html, json, true)?);
            Ok(EXIT_OK)
        }
        Err(e) => {
            let message = output::render_failure(&url, &e, json)?;
            if json {
                println!("{}", message);
            } else {
                eprintln!("{}", message);
            }
            Ok(exit_code_for(&e))
        }
    }
}

// Handles the 'extract' subcommand (no network involved)
fn handle_extract(file: &Path, base: &str, json: bool) -> Result<i32> {
    let base = match normalize_input(base) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Error: invalid --base: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let bytes = if file == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read HTML from stdin")?;
        buf
    } else {
        std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?
    };
    let html = String::from_utf8_lossy(&bytes);

    let links = extract(&html, &base);
    println!("{}", output::render_links(&base, &links, None, json, true)?);

    Ok(EXIT_OK)
}

// Handles the 'interactive' subcommand
//
// Each input line starts a new operation and supersedes the running one.
// A blank line or Ctrl-C cancels the running operation; Ctrl-C with nothing
// running quits. At end of input we wait for the last operation, then exit.
async fn handle_interactive(fetcher: Fetcher, json: bool) -> Result<i32> {
    let lines = BufReader::new(tokio::io::stdin()).lines();
    run_interactive(fetcher, lines, interrupt_channel(), json).await?;
    Ok(EXIT_OK)
}

// Ctrl-C presses as channel messages. The listener is registered once, so
// presses that land while the loop is busy are queued rather than lost.
fn interrupt_channel() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut interrupt = match signal(SignalKind::interrupt()) {
                Ok(interrupt) => interrupt,
                Err(e) => {
                    warn!(error = %e, "cannot listen for Ctrl-C");
                    return;
                }
            };
            while interrupt.recv().await.is_some() {
                if tx.send(()).is_err() {
                    break;
                }
            }
        }

        #[cfg(not(unix))]
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(()).is_err() {
                break;
            }
        }
    });

    rx
}

// The interactive loop itself; returns how many results were shown
async fn run_interactive<R>(
    fetcher: Fetcher,
    mut lines: Lines<R>,
    mut interrupts: mpsc::UnboundedReceiver<()>,
    json: bool,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let (mut session, mut outcomes) = Session::new(fetcher);
    let mut stdin_open = true;
    let mut shown = 0;

    loop {
        if !stdin_open && session.active().is_none() {
            break;
        }

        tokio::select! {
            biased;

            line = lines.next_line(), if stdin_open => {
                match line.context("failed to read stdin")? {
                    Some(line) if line.trim().is_empty() => {
                        if let Some(id) = session.cancel() {
                            debug!(operation = %id, "cancel requested");
                        }
                    }
                    Some(line) => match normalize_input(&line) {
                        Ok(url) => {
                            let id = session.start(url.clone());
                            if !json {
                                eprintln!("🔍 Fetching {} ({})", url, id);
                            }
                        }
                        Err(e) => eprintln!("Error: {}", e),
                    },
                    None => stdin_open = false,
                }
            }
            Some(outcome) = outcomes.next() => {
                session.finish(outcome.id);
                shown += 1;
                match outcome.result {
                    Ok(page) => {
                        println!("{}", output::render_links(&page.url, &page.links, None, json, false)?);
                    }
                    Err(e) => {
                        let message = output::render_failure(&outcome.url, &e, json)?;
                        if json {
                            println!("{}", message);
                        } else {
                            eprintln!("{}", message);
                        }
                    }
                }
            }
            Some(()) = interrupts.recv() => {
                if session.cancel().is_none() {
                    break;
                }
            }
            else => break,
        }
    }

    Ok(shown)
}

fn exit_code_for(error: &FetchError) -> i32 {
    if error.is_cancelled() {
        EXIT_CANCELLED
    } else {
        EXIT_FETCH_FAILED
    }
}
