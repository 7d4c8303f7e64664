//! `scribe glossary` subcommands.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use scribe_glossary::{
    GlossaryClient, load_glossary, render_preview, render_search_results, save_glossary,
};
use scribe_settings::GlossarySettings;

/// Glossary subcommands.
#[derive(Subcommand, Debug)]
pub enum GlossaryCommand {
    /// Download the glossary page, print a preview, and save it as JSON.
    Fetch(FetchArgs),
    /// Search a previously saved glossary file.
    Search(SearchArgs),
}

/// Arguments for `scribe glossary fetch`.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Page to scrape (defaults to `glossary.url`).
    #[arg(long)]
    pub url: Option<String>,

    /// Output JSON file (defaults to `glossary.outputPath`).
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Terms shown per section in the preview; 0 disables it.
    #[arg(long)]
    pub preview_terms: Option<usize>,

    /// Example search run after saving.
    #[arg(long, default_value = "algorithm")]
    pub query: String,

    /// Search results shown.
    #[arg(long, default_value_t = 3)]
    pub results: usize,
}

/// Arguments for `scribe glossary search`.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Case-insensitive substring to look for in terms and definitions.
    pub query: String,

    /// Glossary file (defaults to `glossary.outputPath`).
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Maximum results shown.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

/// Run a glossary subcommand.
pub async fn run(command: GlossaryCommand, settings: &GlossarySettings) -> Result<()> {
    match command {
        GlossaryCommand::Fetch(args) => fetch(args, settings).await,
        GlossaryCommand::Search(args) => search(&args, settings),
    }
}

async fn fetch(args: FetchArgs, settings: &GlossarySettings) -> Result<()> {
    let url = args.url.unwrap_or_else(|| settings.url.clone());
    let output = args.output.unwrap_or_else(|| settings.output_path.clone());
    let preview_terms = args.preview_terms.unwrap_or(settings.preview_terms);

    println!("Fetching glossary from {url}...");
    let client = GlossaryClient::new(
        &settings.user_agent,
        Duration::from_millis(settings.timeout_ms),
    )
    .context("Failed to create HTTP client")?;
    let glossary = client
        .fetch_glossary(&url)
        .await
        .context("Failed to extract glossary")?;

    println!(
        "Successfully extracted glossary with {} sections",
        glossary.len()
    );
    if preview_terms > 0 {
        print!("{}", render_preview(&glossary, preview_terms));
    }

    save_glossary(&glossary, &output)
        .with_context(|| format!("Failed to save glossary to {}", output.display()))?;
    println!("Glossary saved to {}", output.display());

    let hits = glossary.search(&args.query);
    print!("{}", render_search_results(&args.query, &hits, args.results));
    Ok(())
}

fn search(args: &SearchArgs, settings: &GlossarySettings) -> Result<()> {
    let path = args
        .file
        .clone()
        .unwrap_or_else(|| settings.output_path.clone());
    let glossary = load_glossary(&path)
        .with_context(|| format!("Failed to read glossary {}", path.display()))?;
    let hits = glossary.search(&args.query);
    print!("{}", render_search_results(&args.query, &hits, args.limit));
    Ok(())
}
