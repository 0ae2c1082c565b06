// SQLite-backed store for book records

use crate::models::{Book, BookInput, SEED_CREATOR, to_stored_timestamp};
use crate::query::BookQuery;
use chrono::{Duration, Local, TimeZone, Utc};
use eyre::{Context, Result, eyre};
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::{debug, info};

/// Single-table persistence for book records.
///
/// Ids are assigned by SQLite (`AUTOINCREMENT`) and are unique and
/// monotonically increasing. All queries use bound parameters.
pub struct BookStore {
    db: Connection,
}

impl BookStore {
    /// Open or create the database at the given path.
    ///
    /// Creates the `books` table if absent and seeds five demo rows when the
    /// table is empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = Connection::open(path.as_ref()).context("Failed to open SQLite database")?;

        let store = Self { db };
        store.create_schema()?;
        store.seed_if_empty()?;

        Ok(store)
    }

    /// In-memory store, used by tests and demos.
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory database")?;

        let store = Self { db };
        store.create_schema()?;
        store.seed_if_empty()?;

        Ok(store)
    }

    /// Direct access to the underlying connection.
    pub fn db(&self) -> &Connection {
        &self.db
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating database schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                createdAt TEXT NOT NULL,
                createdBy TEXT NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    /// Insert the demo rows, but only into an empty table.
    fn seed_if_empty(&self) -> Result<()> {
        let count: i64 = self
            .db
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        info!("Empty books table, inserting demo rows");

        let now = Utc::now();
        let older = Local
            .with_ymd_and_hms(2025, 5, 10, 13, 0, 0)
            .single()
            .ok_or_else(|| eyre!("Invalid seed date"))?
            .with_timezone(&Utc);

        let seeds = [
            ("Buch Heute", "Autor A", now),
            ("Buch Gestern", "Autor B", now - Duration::days(1)),
            ("Buch Vorgestern", "Autor C", now - Duration::days(2)),
            ("Buch Letzte Woche", "Autor D", now - Duration::days(7)),
            ("Buch Alt", "Autor E", older),
        ];

        for (title, author, created_at) in seeds {
            self.db.execute(
                "INSERT INTO books (title, author, createdAt, createdBy) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![title, author, to_stored_timestamp(created_at), SEED_CREATOR],
            )?;
        }

        Ok(())
    }

    /// List records matching the query; an empty query returns all records
    /// in store default order.
    pub fn list(&self, query: &BookQuery) -> Result<Vec<Book>> {
        let (where_clause, values) = query.to_sql();
        let sql = format!(
            "SELECT id, title, author, createdAt, createdBy FROM books{}",
            where_clause
        );
        debug!(sql = %sql, params = values.len(), "Listing books");

        let mut stmt = self.db.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(values.iter()), Self::row_to_book)?;

        let mut books = Vec::new();
        for row in rows {
            books.push(row.context("Failed to read book row")?);
        }

        Ok(books)
    }

    /// Fetch a record by id.
    pub fn get(&self, id: i64) -> Result<Option<Book>> {
        let book = self
            .db
            .query_row(
                "SELECT id, title, author, createdAt, createdBy FROM books WHERE id = ?1",
                [id],
                Self::row_to_book,
            )
            .optional()?;

        Ok(book)
    }

    /// Create a record, assigning id and creation timestamp. Returns the id.
    pub fn create(&self, input: &BookInput) -> Result<i64> {
        if input.title.trim().is_empty() || input.author.trim().is_empty() {
            return Err(eyre!("Title and author must not be empty"));
        }

        self.db.execute(
            "INSERT INTO books (title, author, createdAt, createdBy) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                input.title,
                input.author,
                to_stored_timestamp(Utc::now()),
                input.creator()
            ],
        )?;

        let id = self.db.last_insert_rowid();
        debug!(id, title = %input.title, "Created book");
        Ok(id)
    }

    /// Replace title, author, and creator of the matching record. The
    /// creation timestamp is never touched. Updating an unknown id matches
    /// zero rows and still succeeds.
    pub fn update(&self, id: i64, input: &BookInput) -> Result<()> {
        let changed = self.db.execute(
            "UPDATE books SET title = ?1, author = ?2, createdBy = ?3 WHERE id = ?4",
            rusqlite::params![input.title, input.author, input.creator(), id],
        )?;
        debug!(id, changed, "Updated book");
        Ok(())
    }

    /// Delete the matching record. Idempotent: unknown ids succeed.
    pub fn delete(&self, id: i64) -> Result<()> {
        let changed = self.db.execute("DELETE FROM books WHERE id = ?1", [id])?;
        debug!(id, changed, "Deleted book");
        Ok(())
    }

    fn row_to_book(row: &Row) -> rusqlite::Result<Book> {
        Ok(Book {
            id: row.get(0)?,
            title: row.get(1)?,
            author: row.get(2)?,
            created_at: row.get(3)?,
            created_by: row.get(4)?,
        })
    }
}
