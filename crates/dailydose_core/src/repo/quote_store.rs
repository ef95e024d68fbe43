//! Quote store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the durable keyed quote collection (insert-if-absent, update,
//!   delete, ordered and filtered reads).
//! - Push ordered snapshots to observers after every committed change.
//!
//! # Invariants
//! - No two rows share the same `quote_text` (UNIQUE column, insert uses
//!   `INSERT OR IGNORE` so check and write are one statement).
//! - All operations are serialized through one connection mutex.
//! - Ordered reads sort by `date_fetched DESC, id DESC`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::quote::{NewQuote, Quote, QuoteId, QuoteValidationError};
use log::warn;
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;

const QUOTE_SELECT_SQL: &str = "SELECT
    id,
    quote_text,
    author,
    date_fetched,
    is_favorite
FROM quotes";

const QUOTE_ORDER_SQL: &str = "ORDER BY date_fetched DESC, id DESC";

const REQUIRED_COLUMNS: &[&str] = &["id", "quote_text", "author", "date_fetched", "is_favorite"];

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for quote persistence and query operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(QuoteValidationError),
    Db(DbError),
    NotFound(QuoteId),
    /// Update would give a record the text of another record.
    DuplicateText(String),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// A previous holder of the store lock panicked.
    LockPoisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "quote not found: {id}"),
            Self::DuplicateText(text) => write!(f, "another quote already has text `{text}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted quote data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::LockPoisoned => write!(f, "quote store lock poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<QuoteValidationError> for StoreError {
    fn from(value: QuoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row subset an observer is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteFilter {
    All,
    FavoritesOnly,
}

/// Push-based view over an ordered quote collection.
///
/// Starts with the snapshot taken at subscription time and receives a new
/// snapshot whenever a committed write changes the filtered rows.
#[derive(Debug, Clone)]
pub struct QuoteFeed {
    receiver: watch::Receiver<Vec<Quote>>,
}

impl QuoteFeed {
    /// Returns the most recent snapshot without marking it seen.
    pub fn snapshot(&self) -> Vec<Quote> {
        self.receiver.borrow().clone()
    }

    /// Returns the most recent snapshot and marks it seen.
    pub fn latest(&mut self) -> Vec<Quote> {
        self.receiver.borrow_and_update().clone()
    }

    /// Returns whether a snapshot arrived since the last `latest()` call.
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `false` once the owning store has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }
}

/// Durable quote collection contract.
///
/// Implementations must serialize writes so concurrent callers never
/// produce duplicate-text rows or lost updates.
pub trait QuoteStore: Send + Sync {
    /// Inserts `quote` unless a row with the same trimmed text exists.
    ///
    /// Returns `true` when a row was inserted; the conflict case is `Ok(false)`.
    fn insert_if_absent(&self, quote: &NewQuote) -> StoreResult<bool>;
    /// Replaces the row with `quote.id`, storing trimmed text and author.
    /// Missing rows yield `NotFound`.
    fn update(&self, quote: &Quote) -> StoreResult<()>;
    /// Removes the row with `quote.id`. Missing rows are a no-op.
    fn delete(&self, quote: &Quote) -> StoreResult<()>;
    fn delete_all(&self) -> StoreResult<()>;
    fn count(&self) -> StoreResult<usize>;
    /// Lists every quote; order is unspecified.
    fn list_all(&self) -> StoreResult<Vec<Quote>>;
    /// Most recently fetched quote (insertion order breaks date ties).
    fn latest(&self) -> StoreResult<Option<Quote>>;
    /// Uniformly selected quote.
    fn random_one(&self) -> StoreResult<Option<Quote>>;
    /// Lookup by trimmed text.
    fn find_by_text(&self, text: &str) -> StoreResult<Option<Quote>>;
    fn find_by_id(&self, id: QuoteId) -> StoreResult<Option<Quote>>;
    /// Sets the favorite flag. Missing rows yield `NotFound`.
    fn set_favorite(&self, id: QuoteId, is_favorite: bool) -> StoreResult<()>;
    /// Subscribes to ordered snapshots of the rows matching `filter`.
    fn observe(&self, filter: QuoteFilter) -> StoreResult<QuoteFeed>;

    /// All quotes, most recently fetched first.
    fn all_ordered(&self) -> StoreResult<QuoteFeed> {
        self.observe(QuoteFilter::All)
    }

    /// Favorite quotes, most recently fetched first.
    fn favorites_ordered(&self) -> StoreResult<QuoteFeed> {
        self.observe(QuoteFilter::FavoritesOnly)
    }
}

struct Observer {
    filter: QuoteFilter,
    sender: watch::Sender<Vec<Quote>>,
}

struct StoreState {
    conn: Connection,
    observers: Vec<Observer>,
}

/// SQLite-backed quote store.
///
/// Owns its connection so it can be shared (`Arc`) between policy services
/// and observers.
pub struct SqliteQuoteStore {
    state: Mutex<StoreState>,
}

impl SqliteQuoteStore {
    /// Constructs a store from a migrated connection.
    ///
    /// Fails when the `quotes` table or any quote column is missing.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_quote_connection_ready(&conn)?;
        Ok(Self {
            state: Mutex::new(StoreState {
                conn,
                observers: Vec::new(),
            }),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, StoreState>> {
        self.state.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl QuoteStore for SqliteQuoteStore {
    fn insert_if_absent(&self, quote: &NewQuote) -> StoreResult<bool> {
        quote.validate()?;
        // Uniqueness is keyed on trimmed text whatever the caller built.

        let mut state = self.lock()?;
        let inserted = state.conn.execute(
            "INSERT OR IGNORE INTO quotes (
                quote_text,
                author,
                date_fetched,
                is_favorite
            ) VALUES (?1, ?2, ?3, 0);",
            params![
                quote.text.trim(),
                quote.author.trim(),
                quote.date_fetched.as_str()
            ],
        )?;

        if inserted > 0 {
            notify_observers(&mut state);
        }
        Ok(inserted > 0)
    }

    fn update(&self, quote: &Quote) -> StoreResult<()> {
        quote.validate()?;

        let mut state = self.lock()?;
        let changed = state
            .conn
            .execute(
                "UPDATE quotes
                 SET
                    quote_text = ?1,
                    author = ?2,
                    date_fetched = ?3,
                    is_favorite = ?4
                 WHERE id = ?5;",
                params![
                    quote.text.trim(),
                    quote.author.trim(),
                    quote.date_fetched.as_str(),
                    bool_to_int(quote.is_favorite),
                    quote.id,
                ],
            )
            .map_err(|err| map_unique_violation(err, quote.text.trim()))?;

        if changed == 0 {
            return Err(StoreError::NotFound(quote.id));
        }

        notify_observers(&mut state);
        Ok(())
    }

    fn delete(&self, quote: &Quote) -> StoreResult<()> {
        let mut state = self.lock()?;
        let changed = state
            .conn
            .execute("DELETE FROM quotes WHERE id = ?1;", [quote.id])?;
        if changed > 0 {
            notify_observers(&mut state);
        }
        Ok(())
    }

    fn delete_all(&self) -> StoreResult<()> {
        let mut state = self.lock()?;
        let changed = state.conn.execute("DELETE FROM quotes;", [])?;
        if changed > 0 {
            notify_observers(&mut state);
        }
        Ok(())
    }

    fn count(&self) -> StoreResult<usize> {
        let state = self.lock()?;
        let count: i64 = state
            .conn
            .query_row("SELECT COUNT(*) FROM quotes;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| StoreError::InvalidData(format!("negative quote count `{count}`")))
    }

    fn list_all(&self) -> StoreResult<Vec<Quote>> {
        let state = self.lock()?;
        query_quotes(&state.conn, &format!("{QUOTE_SELECT_SQL};"), [])
    }

    fn latest(&self) -> StoreResult<Option<Quote>> {
        let state = self.lock()?;
        query_one(
            &state.conn,
            &format!("{QUOTE_SELECT_SQL} {QUOTE_ORDER_SQL} LIMIT 1;"),
            [],
        )
    }

    fn random_one(&self) -> StoreResult<Option<Quote>> {
        let state = self.lock()?;
        query_one(
            &state.conn,
            &format!("{QUOTE_SELECT_SQL} ORDER BY RANDOM() LIMIT 1;"),
            [],
        )
    }

    fn find_by_text(&self, text: &str) -> StoreResult<Option<Quote>> {
        let state = self.lock()?;
        query_one(
            &state.conn,
            &format!("{QUOTE_SELECT_SQL} WHERE quote_text = ?1 LIMIT 1;"),
            [text.trim()],
        )
    }

    fn find_by_id(&self, id: QuoteId) -> StoreResult<Option<Quote>> {
        let state = self.lock()?;
        query_one(
            &state.conn,
            &format!("{QUOTE_SELECT_SQL} WHERE id = ?1;"),
            [id],
        )
    }

    fn set_favorite(&self, id: QuoteId, is_favorite: bool) -> StoreResult<()> {
        let mut state = self.lock()?;
        let changed = state.conn.execute(
            "UPDATE quotes SET is_favorite = ?1 WHERE id = ?2;",
            params![bool_to_int(is_favorite), id],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        notify_observers(&mut state);
        Ok(())
    }

    fn observe(&self, filter: QuoteFilter) -> StoreResult<QuoteFeed> {
        let mut state = self.lock()?;
        let snapshot = query_filtered(&state.conn, filter)?;
        let (sender, receiver) = watch::channel(snapshot);
        state.observers.push(Observer { filter, sender });
        Ok(QuoteFeed { receiver })
    }
}

/// Re-queries every live observer and pushes changed snapshots.
///
/// The write has already been committed, so query failures are logged
/// rather than surfaced to the writer.
fn notify_observers(state: &mut StoreState) {
    state.observers.retain(|observer| !observer.sender.is_closed());

    for observer in &state.observers {
        match query_filtered(&state.conn, observer.filter) {
            Ok(snapshot) => {
                observer.sender.send_if_modified(|current| {
                    if *current == snapshot {
                        false
                    } else {
                        *current = snapshot;
                        true
                    }
                });
            }
            Err(err) => {
                warn!(
                    "event=store_notify module=repo status=error filter={:?} error={}",
                    observer.filter, err
                );
            }
        }
    }
}

fn query_filtered(conn: &Connection, filter: QuoteFilter) -> StoreResult<Vec<Quote>> {
    let sql = match filter {
        QuoteFilter::All => format!("{QUOTE_SELECT_SQL} {QUOTE_ORDER_SQL};"),
        QuoteFilter::FavoritesOnly => {
            format!("{QUOTE_SELECT_SQL} WHERE is_favorite = 1 {QUOTE_ORDER_SQL};")
        }
    };
    query_quotes(conn, &sql, [])
}

fn query_quotes<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> StoreResult<Vec<Quote>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut quotes = Vec::new();

    while let Some(row) = rows.next()? {
        quotes.push(parse_quote_row(row)?);
    }

    Ok(quotes)
}

fn query_one<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> StoreResult<Option<Quote>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_quote_row(row)?));
    }

    Ok(None)
}

fn parse_quote_row(row: &Row<'_>) -> StoreResult<Quote> {
    let is_favorite = match row.get::<_, i64>("is_favorite")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid is_favorite value `{other}` in quotes.is_favorite"
            )));
        }
    };

    let quote = Quote {
        id: row.get("id")?,
        text: row.get("quote_text")?,
        author: row.get("author")?,
        date_fetched: row.get("date_fetched")?,
        is_favorite,
    };
    quote
        .validate()
        .map_err(|err| StoreError::InvalidData(format!("quote {}: {err}", quote.id)))?;
    Ok(quote)
}

fn map_unique_violation(err: rusqlite::Error, text: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            StoreError::DuplicateText(text.to_string())
        }
        _ => err.into(),
    }
}

fn ensure_quote_connection_ready(conn: &Connection) -> StoreResult<()> {
    if !table_exists(conn, "quotes")? {
        return Err(StoreError::MissingRequiredTable("quotes"));
    }

    for &column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "quotes", column)? {
            return Err(StoreError::MissingRequiredColumn {
                table: "quotes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get("name")?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
