mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, DEFAULT_CONFIG_PATH};
use ff_core::config::Config;
use ff_core::BookId;
use ff_db::models::Table;
use ff_db::pool::{get_conn, init_pool, DbPool};
use ff_db::queries::{books, reviews};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "fastfiction=trace,ff_server=debug,ff_db=debug,tower_http=debug".to_string()
        } else {
            "fastfiction=info,ff_server=info,ff_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("fastfiction {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(db) = cli.database {
        config.database.path = db;
    }

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_seed,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if no_seed {
                config.seed.on_startup = false;
            }
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(ff_server::start(config))?;
            Ok(())
        }
        Commands::Seed => seed(&config),
        Commands::Books { json } => list_books(&open_db(&config)?, json),
        Commands::Reviews { book_id, json } => {
            list_reviews(&open_db(&config)?, parse_book_id(&book_id)?, json)
        }
        Commands::Unreviewed { json } => list_unreviewed(&open_db(&config)?, json),
        Commands::Text { book_id } => print_text(&open_db(&config)?, parse_book_id(&book_id)?),
        Commands::Dump { table } => {
            let table: Table = table.parse()?;
            dump(&open_db(&config)?, table)
        }
        Commands::Validate => validate_config(&config),
        Commands::Version => Ok(()),
    }
}

/// Load the config file. An explicitly named file must exist; the default
/// path falls back to built-in defaults when absent.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file does not exist: {}", p.display());
            }
            Ok(Config::load(p)?)
        }
        None => Ok(Config::load(Path::new(DEFAULT_CONFIG_PATH))?),
    }
}

fn open_db(config: &Config) -> Result<DbPool> {
    init_pool(&config.database)
        .with_context(|| format!("Cannot open database {}", config.database.path.display()))
}

fn parse_book_id(raw: &str) -> Result<BookId> {
    raw.parse()
        .map_err(|_| anyhow::anyhow!("Invalid book ID '{raw}': expected an integer"))
}

fn seed(config: &Config) -> Result<()> {
    let pool = open_db(config)?;
    let conn = get_conn(&pool)?;
    let report = ff_db::seed::seed_if_empty(&conn, config.seed.effective_bcrypt_cost())?;

    if report.total() == 0 {
        println!("Catalog already seeded; nothing inserted");
    } else {
        println!(
            "Seeded {} authors, {} books, {} users, {} reviews",
            report.authors, report.books, report.users, report.reviews
        );
    }
    Ok(())
}

fn list_books(pool: &DbPool, json: bool) -> Result<()> {
    let conn = get_conn(pool)?;
    let books = books::list_with_ratings(&conn)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }
    if books.is_empty() {
        println!("No books in the catalog");
    }
    for b in &books {
        println!(
            "{:>4}  {} by {}  Average Rating: {} ({} reviews)",
            b.id.get(),
            b.title,
            b.author,
            ff_server::pages::format_rating(b.average_rating),
            b.review_count
        );
    }
    Ok(())
}

fn list_reviews(pool: &DbPool, book_id: BookId, json: bool) -> Result<()> {
    let conn = get_conn(pool)?;
    let book = books::get_book(&conn, book_id)?
        .ok_or_else(|| ff_core::Error::not_found("book", book_id))?;
    let reviews = reviews::list_for_book(&conn, book_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reviews)?);
        return Ok(());
    }
    println!("Reviews of {}:", book.title);
    if reviews.is_empty() {
        println!("  No reviews for this book yet.");
    }
    for r in &reviews {
        println!("  {} ({}/5): {}", r.username, r.rating, r.review_text);
    }
    Ok(())
}

fn list_unreviewed(pool: &DbPool, json: bool) -> Result<()> {
    let conn = get_conn(pool)?;
    let books = books::list_without_reviews(&conn)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }
    if books.is_empty() {
        println!("Every book has at least one review");
    }
    for b in &books {
        println!("{:>4}  {} by {}", b.id.get(), b.title, b.author);
    }
    Ok(())
}

fn print_text(pool: &DbPool, book_id: BookId) -> Result<()> {
    let conn = get_conn(pool)?;
    let book = books::get_book_text(&conn, book_id)?
        .ok_or_else(|| ff_core::Error::not_found("book", book_id))?;

    match book.text {
        Some(text) => println!("{text}"),
        None => println!("{} has no full text yet.", book.title),
    }
    Ok(())
}

fn dump(pool: &DbPool, table: Table) -> Result<()> {
    let conn = get_conn(pool)?;
    let rows = ff_db::queries::dump_table(&conn, table)?;
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    let warnings = config.validate();
    if warnings.is_empty() {
        println!("✓ Configuration is valid");
    } else {
        println!("Configuration has {} warning(s):", warnings.len());
        for w in &warnings {
            println!("  - {w}");
        }
    }
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Database: {}", config.database.path.display());
    println!("  Pool size: {}", config.database.pool_size);
    println!("  Seed on startup: {}", config.seed.on_startup);
    Ok(())
}
