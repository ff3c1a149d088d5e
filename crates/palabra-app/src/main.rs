use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use palabra_cache::CacheStore;
use palabra_config::Config;
use palabra_core::{Assembler, WorkerCommand, keys};
use palabra_fetch::SuggestClient;
use palabra_jobs::PidfileRunner;
use palabra_scrape::DetailClient;

#[derive(Parser)]
#[command(
    name = "palabra",
    about = "RAE dictionary autocomplete backend for launcher front ends"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one interactive pass and print the feedback JSON on stdout
    Query {
        /// Partial word to complete (multiple tokens are rejected as invalid)
        #[arg(trailing_var_arg = true)]
        words: Vec<String>,
    },
    /// Fetch and cache one word's articles, then exit (background worker)
    UpdateDetails { word: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::new();

    match cli.command {
        Commands::Query { words } => query(&config, words.join(" ")).await,
        Commands::UpdateDetails { word } => update_details(&config, &word).await,
    }
}

/// One interactive pass. Never waits on a background job; a rerun field in
/// the printed feedback tells the host when to invoke us again.
async fn query(config: &Config, raw: String) -> anyhow::Result<()> {
    let cache = CacheStore::open(&config.cache.dir).context("opening cache store")?;
    let jobs = PidfileRunner::new(config.cache.jobs_dir()).context("opening job runner")?;

    let timeout = Duration::from_secs(config.network.timeout_seconds);
    let suggest = SuggestClient::new(config.network.suggest_url.clone(), timeout);

    let worker = WorkerCommand {
        program: std::env::current_exe().context("locating worker executable")?,
        args: vec!["update-details".to_string()],
    };

    let assembler = Assembler::new(cache, Box::new(suggest), Box::new(jobs), worker, config);
    let feedback = assembler.respond(&raw).await?;

    println!("{}", serde_json::to_string(&feedback)?);
    Ok(())
}

/// Worker entry point: the job's only terminal effect is the cache write.
/// A fetch failure exits nonzero and leaves the key unpopulated; the
/// interactive pass keeps showing the placeholder and rerunning.
async fn update_details(config: &Config, word: &str) -> anyhow::Result<()> {
    let cache = CacheStore::open(&config.cache.dir).context("opening cache store")?;

    let timeout = Duration::from_secs(config.network.timeout_seconds);
    let client = DetailClient::new(config.network.search_url.clone(), timeout);

    let articles = client
        .fetch(word)
        .await
        .with_context(|| format!("fetching details for '{word}'"))?;
    cache.write(&keys::details_key(word), &articles)?;

    tracing::info!("cached {} article(s) for '{word}'", articles.len());
    Ok(())
}

fn init_tracing() {
    // Feedback JSON owns stdout; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .init();
}
