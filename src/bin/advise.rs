use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use catan_advisor::advisor::AdvisorClient;
use catan_advisor::cli::App;
use catan_advisor::scenario;
use catan_advisor::store::BoardStore;
use catan_advisor::template::BoardTemplate;
use catan_advisor::types::Color;

#[derive(Debug, Parser)]
#[command(name = "advise")]
#[command(about = "Reconstruct a Catan board and ask the advisor for the next move")]
struct Args {
    /// Base URL of the advisory service
    #[arg(long, env = "ADVISOR_URL", default_value = "http://localhost:5001")]
    server: String,

    /// Number of seated players (2-4)
    #[arg(long, default_value_t = 2)]
    players: u8,

    /// Color receiving the advice (RED, BLUE, ORANGE, WHITE)
    #[arg(long, default_value = "RED")]
    color: String,

    /// Start from a randomly generated scenario
    #[arg(long)]
    random: bool,

    /// Seed for --random; unseeded runs differ every time
    #[arg(long)]
    seed: Option<u64>,

    /// Write tracing output to this file (the TUI owns the terminal)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let advised: Color = args
        .color
        .to_uppercase()
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown color '{}'; use RED, BLUE, ORANGE, or WHITE", args.color))?;

    if !(2..=4).contains(&args.players) {
        bail!("--players must be between 2 and 4");
    }
    if !Color::active(args.players as usize).contains(&advised) {
        bail!("{advised} is not seated in a {}-player game", args.players);
    }

    let client = AdvisorClient::new(args.server.clone())?;
    let template = fetch_with_retry(&client)?;

    let mut store = BoardStore::new(template, args.players, advised);
    if args.random {
        match args.seed {
            Some(seed) => scenario::generate(&mut store, &mut StdRng::seed_from_u64(seed)),
            None => scenario::generate(&mut store, &mut rand::thread_rng()),
        }
    }

    let mut app = App::new(store, client);
    app.run().context("terminal error")?;
    Ok(())
}

/// The template is fatal to the screen: without it nothing can be edited,
/// so keep offering a retry until the user gives up.
fn fetch_with_retry(client: &AdvisorClient) -> Result<BoardTemplate> {
    loop {
        match client.fetch_template() {
            Ok(template) => return Ok(template),
            Err(err) => {
                eprintln!(
                    "Failed to load the board template from {}: {err}",
                    client.base_url()
                );
                eprint!("Press Enter to retry, or 'q' then Enter to quit: ");
                io::stderr().flush().ok();
                let mut line = String::new();
                io::stdin().read_line(&mut line)?;
                if line.trim().eq_ignore_ascii_case("q") {
                    bail!("board template unavailable");
                }
            }
        }
    }
}
