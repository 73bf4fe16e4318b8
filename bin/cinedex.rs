use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cinedex::{EngineConfig, JsonFileSource, MovieIndexer, MovieResult};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "cinedex")]
#[command(about = "Full-text movie search over a JSON record file", long_about = None)]
struct Args {
    /// JSON array of movie records
    #[arg(long, env = "CINEDEX_RECORDS", default_value = "movies.json")]
    records: PathBuf,

    /// Engine configuration (JSON); defaults apply to absent keys
    #[arg(long, env = "CINEDEX_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of results
    #[arg(long, env = "CINEDEX_LIMIT")]
    limit: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Boosted search over title, year, actors and genres
    Search { query: String },
    /// Same fields as `search`, without boosts
    Plain { query: String },
    /// Exact release year
    Year { year: String },
    /// Fuzzy title search restricted to every given genre
    Genres {
        query: String,
        #[arg(long = "genre", required = false)]
        genres: Vec<String>,
    },
    /// Print the segment manifest
    Stats,
}

fn main() -> Result<()> {
    // Logs go to stderr so results on stdout stay machine readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting cinedex v{}", cinedex::VERSION);

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(limit) = args.limit {
        config = config.with_default_limit(limit);
    }

    let source = JsonFileSource::new(&args.records);
    let indexer = MovieIndexer::from_source(&source, config)
        .with_context(|| format!("indexing {}", args.records.display()))?;

    let results = match &args.command {
        Command::Search { query } => indexer.search(query)?,
        Command::Plain { query } => indexer.search_without_boost(query)?,
        Command::Year { year } => indexer.search_by_year(year)?,
        Command::Genres { query, genres } => indexer.search_with_genres(query, genres.as_slice())?,
        Command::Stats => {
            let manifest = indexer.manifest().to_json()?;
            println!("{}", String::from_utf8_lossy(&manifest));
            return Ok(());
        }
    };

    print_results(&results)
}

fn print_results(results: &[MovieResult]) -> Result<()> {
    info!(hits = results.len(), "Search finished");
    println!("{}", serde_json::to_string_pretty(results)?);
    Ok(())
}
