/// Cadence Console - headless playlist player
use anyhow::Context;
use cadence_console::{commands::HELP, render, session, Command, ConsoleConfig, Flow, Session};
use clap::Parser;
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence-console")]
#[command(about = "Cadence playlist player driven from stdin", long_about = None)]
struct Cli {
    /// Track list (JSON array of tracks)
    #[arg(short, long, env = "CADENCE_TRACKS")]
    tracks: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_console=info,cadence_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ConsoleConfig::load(cli.config.as_deref())?;
    config.validate().context("Invalid configuration")?;

    let tracks = session::read_tracks(&cli.tracks)?;
    tracing::info!("Starting Cadence console");
    tracing::info!("Tracks: {}", cli.tracks.display());

    let mut session = Session::new(tracks, config);
    run(&mut session)
}

fn run(session: &mut Session) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    writeln!(out, "{}", render::report(session))?;
    writeln!(out, "type `help` for commands")?;

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        if command == Command::Help {
            writeln!(out, "{HELP}")?;
            continue;
        }

        match session.execute(command) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => writeln!(out, "{}", render::report(session))?,
            Err(e) => writeln!(out, "error: {e}")?,
        }
    }

    tracing::info!("Bye");
    Ok(())
}
