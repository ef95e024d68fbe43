//! DailyDose command-line front end.
//!
//! # Responsibility
//! - Resolve config, database and log locations.
//! - Forward one user intent into `dailydose_core` and print the result.

mod args;

use args::{Cli, Commands};
use clap::Parser;
use dailydose_core::db::open_db;
use dailydose_core::{
    init_logging, DailyDoseConfig, DailyQuoteService, DisplayedQuote, HistoryService, Quote,
    QuoteError, QuoteId, QuoteStore, SqliteQuoteStore, ZenQuotesSource,
};
use directories::ProjectDirs;
use log::warn;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const DB_FILE_NAME: &str = "dailydose.sqlite3";

type Service = DailyQuoteService<SqliteQuoteStore, ZenQuotesSource>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = load_config(&cli)?;
    let dirs = ProjectDirs::from("com", "dailydose", "dailydose");

    if let Some(log_dir) = resolve_log_dir(&config, dirs.as_ref()) {
        if let Err(err) = init_logging(&config.log_level, &log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let db_path = resolve_db_path(&cli, &config, dirs.as_ref())?;
    let conn = open_db(&db_path).map_err(|err| format!("{}: {err}", db_path.display()))?;
    let store = Arc::new(SqliteQuoteStore::try_new(conn).map_err(|err| err.to_string())?);
    let source = Arc::new(ZenQuotesSource::new(
        config.api_base_url.clone(),
        config.request_timeout(),
    ));

    match cli.command {
        Commands::Today => {
            let service = DailyQuoteService::new(store, source);
            print_outcome(service.load())
        }
        Commands::Refresh { after } => {
            let service = service_after(store, source, after)?;
            print_outcome(service.refresh())
        }
        Commands::Random { after } => {
            let service = service_after(store, source, after)?;
            print_outcome(service.show_random())
        }
        Commands::History { favorites } => {
            let history = HistoryService::new(store);
            let feed = if favorites {
                history.favorite_quotes()
            } else {
                history.all_quotes()
            };
            let quotes = feed.map_err(|err| err.to_string())?.snapshot();
            if quotes.is_empty() {
                println!("No quotes stored yet.");
            }
            for quote in &quotes {
                print_row(quote);
            }
            Ok(())
        }
        Commands::Favorite { id } => {
            let quote = require_quote(store.as_ref(), id)?;
            let service = DailyQuoteService::new(store, source);
            let updated = service
                .toggle_favorite(&quote)
                .map_err(|err| err.to_string())?;
            print_row(&updated);
            Ok(())
        }
        Commands::Delete { id } => {
            let quote = require_quote(store.as_ref(), id)?;
            let service = DailyQuoteService::new(store, source);
            service.delete(&quote).map_err(|err| err.to_string())?;
            println!("Deleted quote {id}.");
            Ok(())
        }
        Commands::Clear => {
            HistoryService::new(store)
                .clear_all()
                .map_err(|err| err.to_string())?;
            println!("All quotes deleted.");
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<DailyDoseConfig, String> {
    let base = match &cli.config {
        Some(path) => DailyDoseConfig::from_json_file(path).map_err(|err| err.to_string())?,
        None => DailyDoseConfig::default(),
    };
    base.apply_env_overrides().map_err(|err| err.to_string())
}

fn resolve_db_path(
    cli: &Cli,
    config: &DailyDoseConfig,
    dirs: Option<&ProjectDirs>,
) -> Result<PathBuf, String> {
    if let Some(path) = cli.db.clone().or_else(|| config.db_path.clone()) {
        return Ok(path);
    }

    let Some(dirs) = dirs else {
        return Ok(PathBuf::from(DB_FILE_NAME));
    };
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .map_err(|err| format!("failed to create `{}`: {err}", data_dir.display()))?;
    Ok(data_dir.join(DB_FILE_NAME))
}

fn resolve_log_dir(config: &DailyDoseConfig, dirs: Option<&ProjectDirs>) -> Option<PathBuf> {
    config
        .log_dir
        .clone()
        .or_else(|| dirs.map(|dirs| dirs.data_local_dir().join("logs")))
}

/// Builds a service that treats quote `after` as currently shown.
fn service_after(
    store: Arc<SqliteQuoteStore>,
    source: Arc<ZenQuotesSource>,
    after: Option<QuoteId>,
) -> Result<Service, String> {
    let current = match after {
        Some(id) => Some(require_quote(store.as_ref(), id)?),
        None => None,
    };
    let service = DailyQuoteService::new(store, source);
    service.set_current(current);
    Ok(service)
}

fn require_quote(store: &SqliteQuoteStore, id: QuoteId) -> Result<Quote, String> {
    store
        .find_by_id(id)
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("no quote with id {id}"))
}

fn print_outcome(outcome: Result<DisplayedQuote, QuoteError>) -> Result<(), String> {
    match outcome {
        Ok(displayed) => {
            if let Some(advisory) = displayed.advisory {
                println!("({advisory})");
            }
            let quote = &displayed.quote;
            println!("\"{}\"", quote.text);
            println!("    -- {}", quote.author);
            println!("[#{} {}{}]", quote.id, quote.date_fetched, favorite_marker(quote));
            Ok(())
        }
        Err(err) => {
            warn!("event=cli_outcome module=cli status=error error={err}");
            Err(err.to_string())
        }
    }
}

fn print_row(quote: &Quote) {
    println!(
        "{:>4}  {}{}  \"{}\" -- {}",
        quote.id,
        quote.date_fetched,
        favorite_marker(quote),
        quote.text,
        quote.author
    );
}

fn favorite_marker(quote: &Quote) -> &'static str {
    if quote.is_favorite {
        " *"
    } else {
        ""
    }
}
