use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use moviesearch_core::persist::{save_index, save_meta, IndexPaths, MetaFile};
use moviesearch_core::{build_index, MovieRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build the n-gram inverted index from crawled movie records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from an id->record JSON file
    Build {
        /// Path to the crawled movies JSON file
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output } => build(&input, &output),
    }
}

fn build(input: &str, output: &str) -> Result<()> {
    tracing::info!(input, "loading movie records");
    let f = File::open(input).with_context(|| format!("opening {input}"))?;
    // Every record must carry a title; deserialization fails fast otherwise.
    let records: HashMap<String, MovieRecord> =
        serde_json::from_reader(BufReader::new(f)).context("parsing movie records")?;
    tracing::info!(num_records = records.len(), "records loaded");

    let index = build_index(&records);

    let paths = IndexPaths::new(output);
    save_index(&paths, &index)?;
    let meta = MetaFile {
        num_movies: index.num_movies(),
        num_tokens: index.num_tokens() as u64,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        version: 1,
    };
    save_meta(&paths, &meta)?;

    tracing::info!(
        output,
        num_movies = meta.num_movies,
        num_tokens = meta.num_tokens,
        "index build complete"
    );
    Ok(())
}
