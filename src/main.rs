//! bookstore CLI - seed the books collection and run the query catalog

use bookstore::catalog::{self, CatalogReport};
use bookstore::config::{self, Config, Mode};
use bookstore::seed::{self, SeedReport};
use bookstore::storage::dataset;
use bookstore::error::failure_hints;
use bookstore::{Error, MongoStore, OfflineStore};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bookstore")]
#[command(about = "Seed a MongoDB book collection and run a fixed query catalog", long_about = None)]
struct Cli {
    /// MongoDB connection string
    #[arg(long, global = true, env = "MONGODB_URI", default_value = config::DEFAULT_URI)]
    uri: String,

    /// Run against an in-memory copy of the dataset instead of MongoDB
    #[arg(
        long,
        global = true,
        env = "NO_DB",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    offline: bool,

    /// Sample record set (.json, .yaml or .yml)
    #[arg(short, long, global = true, env = "BOOKSTORE_DATA", default_value = config::DEFAULT_DATASET)]
    data: PathBuf,

    /// Database name
    #[arg(long, global = true, env = "BOOKSTORE_DATABASE", default_value = config::DEFAULT_DATABASE)]
    database: String,

    /// Collection name
    #[arg(long, global = true, env = "BOOKSTORE_COLLECTION", default_value = config::DEFAULT_COLLECTION)]
    collection: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the collection contents with the sample books
    Seed,

    /// Run the query catalog
    Queries,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            uri: self.uri.clone(),
            database: self.database.clone(),
            collection: self.collection.clone(),
            dataset: self.data.clone(),
            mode: if self.offline { Mode::Offline } else { Mode::Online },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = cli.config();

    let result = match cli.command {
        Commands::Seed => seed_collection(&config).await,
        Commands::Queries => run_queries(&config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            for hint in failure_hints(err.downcast_ref::<Error>(), config.mode) {
                eprintln!("Tip: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn seed_collection(config: &Config) -> anyhow::Result<()> {
    let books = dataset::load(&config.dataset).await?;

    let report = match config.mode {
        Mode::Offline => {
            println!("Offline dry run: seeding an in-memory copy of {}", config.namespace());
            let mut store = OfflineStore::default();
            seed::seed(&mut store, &books).await?
        }
        Mode::Online => {
            let mut store = MongoStore::connect(config).await?;
            println!("Connected to MongoDB server");
            let report = seed::seed(&mut store, &books).await;
            store.close().await;
            println!("Connection closed");
            report?
        }
    };

    print_seed_report(&report);
    Ok(())
}

async fn run_queries(config: &Config) -> anyhow::Result<()> {
    let report = match config.mode {
        Mode::Offline => {
            println!("Offline dry-run mode: simulating queries without a database");
            let mut store = OfflineStore::load(config).await?;
            catalog::run(&mut store).await?
        }
        Mode::Online => {
            println!("Online mode: running queries against MongoDB");
            let mut store = MongoStore::connect(config).await?;
            let report = catalog::run(&mut store).await;
            store.close().await;
            report?
        }
    };

    print_catalog(&report);
    Ok(())
}

fn print_seed_report(report: &SeedReport) {
    if report.dropped > 0 {
        println!(
            "Collection already contained {} documents; it was dropped",
            report.dropped
        );
    }
    println!("{} books were successfully inserted", report.inserted);

    println!();
    println!("Inserted books:");
    for book in &report.contents {
        println!(
            "{}. \"{}\" by {} ({})",
            book.index, book.title, book.author, book.published_year
        );
    }
}

fn print_catalog(report: &CatalogReport) {
    let crud = &report.crud;
    println!();
    println!("Basic CRUD:");
    println!("  Find genre={} -> {} docs", catalog::SAMPLE_GENRE, crud.genre_matches);
    println!("  Find after year={} -> {} docs", catalog::SAMPLE_YEAR, crud.after_year_matches);
    println!("  Find author={} -> {} docs", catalog::SAMPLE_AUTHOR, crud.author_matches);
    println!(
        "  Update price of {} -> matched {}, modified {}",
        catalog::SAMPLE_UPDATE.0,
        crud.update.matched,
        crud.update.modified
    );
    println!(
        "  Delete \"{}\" -> {} removed (no-op if not found)",
        catalog::SAMPLE_DELETE,
        crud.delete.deleted
    );

    let advanced = &report.advanced;
    println!();
    println!("Advanced queries:");
    println!("  In stock after 2010 -> {}", pretty(&advanced.in_stock_after_2010));
    println!("  Projection (title, author, price) -> {}", pretty(&advanced.projection));
    println!("  Sort price asc (first {}) -> {}", catalog::SORT_PREVIEW, pretty(&advanced.cheapest));
    println!("  Sort price desc (first {}) -> {}", catalog::SORT_PREVIEW, pretty(&advanced.most_expensive));
    println!("  Pagination page=1 -> {}", pretty(&advanced.page_one));
    println!("  Pagination page=2 -> {}", pretty(&advanced.page_two));

    let aggregations = &report.aggregations;
    println!();
    println!("Aggregations:");
    println!("  Average price by genre -> {}", pretty(&aggregations.average_price_by_genre));
    println!("  Author with most books -> {}", pretty(&aggregations.author_with_most_books));
    println!("  Group by decade -> {}", pretty(&aggregations.books_by_decade));

    let indexing = &report.indexing;
    println!();
    println!("Indexing:");
    println!("  Create index title -> {}", indexing.title_index);
    println!("  Create compound index author+published_year -> {}", indexing.author_year_index);
    println!("  Explain plan for title search ({}) -> {}", bookstore::query::EXPLAIN_TITLE, pretty(&indexing.explain.plan));
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unprintable: {}>", e))
}
