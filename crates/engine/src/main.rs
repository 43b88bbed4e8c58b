//! Storyloom driver entry point.
//!
//! Launches a story in single player (interactive fiction) or
//! multiuser mode. The engine proper only talks to abstract
//! connections; this binary wires up a plain console adapter.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storyloom_engine::driver::{multi, single, Driver};
use storyloom_engine::ports::{self, AdapterHandle};
use storyloom_engine::story::GameMode;
use storyloom_shared::{PromptMode, ServerEvent};

#[derive(Debug, Parser)]
#[command(
    name = "storyloom",
    about = "Storyloom interactive-world engine. Use this to launch a story."
)]
struct Args {
    /// Path to the game directory.
    #[arg(short, long)]
    game: PathBuf,

    /// Game mode.
    #[arg(short, long, default_value = "if")]
    mode: GameMode,

    /// Screen output delay per line in single player mode
    /// (milliseconds, 0 = no delay).
    #[arg(short, long, default_value_t = 50)]
    delay: u64,

    /// Use a GUI adapter (requires an external adapter process).
    #[arg(long)]
    gui: bool,

    /// Use a web browser adapter (requires an external adapter process).
    #[arg(long)]
    web: bool,

    /// Only verify the story files, don't run the game.
    #[arg(short, long)]
    verify: bool,
}

/// Exit code for incompatible savegame data.
const EXIT_BAD_SAVEDATA: i32 = 10;

#[tokio::main]
async fn main() {
    let code = match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            1
        }
    };
    std::process::exit(code);
}

async fn run() -> anyhow::Result<i32> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyloom_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    if args.delay > 100 {
        anyhow::bail!("invalid delay, valid range is 0-100");
    }
    let mut story = storyloom_engine::demo::load_story(&args.game)
        .ok_or_else(|| anyhow::anyhow!("cannot find the specified game: {}", args.game.display()))?;

    if args.verify {
        let config = story.config();
        let _driver = Driver::create(story.as_mut(), args.mode)?;
        println!(
            "Story: '{}' v{}, by {}.",
            config.name, config.version, config.author
        );
        println!("Verified, all seems to be fine.");
        return Ok(0);
    }

    if args.gui || args.web {
        tracing::warn!("gui/web adapters run out of process; using the console adapter here");
    }

    let mut driver = Driver::create(story.as_mut(), args.mode)?;
    tracing::info!(story = %driver.config.name, mode = %args.mode, "driver starting");

    match args.mode {
        GameMode::If => {
            let (io, adapter) = ports::channel_io(driver.input_signal.clone());
            tokio::spawn(console_adapter(adapter, args.delay));
            let code = single::run(&mut driver, story.as_mut(), Box::new(io)).await?;
            if code == EXIT_BAD_SAVEDATA {
                tracing::error!("stopped because of incompatible save data");
            }
            Ok(code)
        }
        GameMode::Mud => {
            let accounts_db = "useraccounts.sqlite";
            let accounts = storyloom_engine::accounts::SqliteAccounts::connect(accounts_db)
                .await
                .map_err(|err| {
                    anyhow::anyhow!(
                        "cannot launch mud mode without a user accounts database: {}",
                        err
                    )
                })?;
            driver.accounts = Some(Arc::new(accounts));
            let (connections_tx, connections_rx) = mpsc::unbounded_channel();
            // the launcher owns the network adapter; here we attach a
            // single local console session
            let (io, adapter) = ports::channel_io(driver.input_signal.clone());
            tokio::spawn(console_adapter(adapter, 0));
            connections_tx
                .send(Box::new(io) as Box<dyn ports::ConnectionIo>)
                .ok();
            if let (Some(host), Some(port)) = (&driver.config.mud_host, driver.config.mud_port) {
                tracing::info!(host = %host, port, "mud mode; network adapter attaches here");
            }
            multi::run(&mut driver, story.as_mut(), connections_rx).await
        }
    }
}

/// A minimal console adapter: renders server events to stdout and
/// feeds stdin lines back to the driver.
async fn console_adapter(mut handle: AdapterHandle, delay_ms: u64) {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    loop {
        tokio::select! {
            event = handle.events.recv() => {
                match event {
                    Some(ServerEvent::Output { region }) => {
                        for line in region.plain_text().lines() {
                            println!("{}", line);
                            if delay_ms > 0 {
                                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                            }
                        }
                    }
                    Some(ServerEvent::InputPrompt) => {
                        print!(">> ");
                        use std::io::Write;
                        let _ = std::io::stdout().flush();
                    }
                    Some(ServerEvent::DialogPrompt { mode, prompt }) => {
                        let suffix = match mode {
                            PromptMode::InputNoEcho => " (input is not hidden on this console)",
                            PromptMode::Input => "",
                        };
                        if !prompt.is_empty() {
                            println!("{}{}", storyloom_shared::strip_style_tags(&prompt), suffix);
                        }
                        print!("> ");
                        use std::io::Write;
                        let _ = std::io::stdout().flush();
                    }
                    Some(ServerEvent::ClearScreen) => {
                        print!("\x1b[2J\x1b[H");
                    }
                    Some(ServerEvent::SessionEnded) | None => break,
                }
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(text)) => handle.send_line(text),
                    _ => {
                        handle.send(storyloom_shared::ClientEvent::Disconnected);
                        break;
                    }
                }
            }
        }
    }
}
