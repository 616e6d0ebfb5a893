//! Citegraph CLI: build and query a citation graph.
//!
//! Usage:
//!   citegraph add <title> [--year Y] [--authors "A, B"] [--journal J] [--cites "X, Y"]
//!   citegraph load <records.json | records.csv>
//!   citegraph papers | author <name> | citations <title> | influential [--limit N] | graph

use citegraph::{
    read_records, CitationGraph, CitegraphApi, Config, InMemoryCache, OpenStore, PaperRecord,
    SqliteStore,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "citegraph",
    version,
    about = "Academic citation graph engine"
)]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Path to SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Disable the query cache
    #[arg(long, global = true)]
    no_cache: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one paper
    Add {
        /// Paper title
        title: String,
        #[arg(long)]
        year: Option<String>,
        /// Comma-separated author names
        #[arg(long)]
        authors: Option<String>,
        #[arg(long)]
        journal: Option<String>,
        /// Comma-separated titles of cited papers
        #[arg(long)]
        cites: Option<String>,
    },
    /// Load paper records from a JSON array or a CSV file (by extension)
    Load {
        #[arg(required = true)]
        path: PathBuf,
    },
    /// List all papers
    Papers,
    /// Papers written by an author
    Author {
        name: String,
    },
    /// What a paper cites and what cites it
    Citations {
        title: String,
    },
    /// Most cited papers
    Influential {
        /// Number of papers (defaults to the configured limit)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Every node and edge
    Graph,
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_api(config: &Config, db: Option<PathBuf>, no_cache: bool) -> Result<CitegraphApi, String> {
    let db_path = db.unwrap_or_else(|| config.database_path());
    let store = SqliteStore::open(&db_path).map_err(|e| format!("Failed to open database: {}", e))?;
    let graph = CitationGraph::with_store(Arc::new(store));
    graph
        .hydrate()
        .map_err(|e| format!("Failed to load graph: {}", e))?;

    let api = CitegraphApi::new(Arc::new(graph));
    if no_cache || !config.cache.enabled {
        return Ok(api);
    }
    Ok(api.with_cache(Arc::new(InMemoryCache::new()), config.cache.ttl()))
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_add(api: &CitegraphApi, record: PaperRecord) -> i32 {
    match api.add_paper(&record) {
        Ok(report) => {
            for rejection in &report.rejections {
                eprintln!("Warning: {}", rejection);
            }
            print_json(&report)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_load(api: &CitegraphApi, path: &Path) -> i32 {
    let records = match read_records(path) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let report = api.load_records(&records);
    for failure in &report.failures {
        eprintln!(
            "Warning: record {} ('{}') skipped: {}",
            failure.index, failure.title, failure.error
        );
    }
    print_json(&report)
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config.log_level);

    let api = match open_api(&config, cli.db, cli.no_cache) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Add {
            title,
            year,
            authors,
            journal,
            cites,
        } => {
            let mut record = PaperRecord::new(title);
            if let Some(year) = year {
                record = record.with_year(year);
            }
            if let Some(authors) = authors {
                record = record.with_authors(authors);
            }
            if let Some(journal) = journal {
                record = record.with_journal(journal);
            }
            if let Some(cites) = cites {
                record = record.citing(cites);
            }
            cmd_add(&api, record)
        }
        Commands::Load { path } => cmd_load(&api, &path),
        Commands::Papers => print_json(&api.papers()),
        Commands::Author { name } => print_json(&api.papers_by_author(&name)),
        Commands::Citations { title } => print_json(&api.citations(&title)),
        Commands::Influential { limit } => {
            print_json(&api.most_influential(limit.unwrap_or(config.influential_limit)))
        }
        Commands::Graph => print_json(&api.graph_view()),
    };
    std::process::exit(code);
}
