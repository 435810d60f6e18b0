//! [`SqliteStore`] — the SQLite implementation of [`BookStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use tome_core::{
  book::{Book, NewBook, Reader},
  store::{BookFilter, BookStore},
  target::{DailyTarget, NewTarget},
};

use crate::{
  Error, Result,
  encode::{RawBook, RawReader, RawTarget, encode_dt, encode_uuid},
  schema::SCHEMA,
};

const BOOK_COLUMNS: &str = "book_id, reader_id, title, author, page_count, \
                            current_page, start_date, target_date, rate_goal, \
                            archived_at";

const TARGET_COLUMNS: &str = "target_id, book_id, target_page, calculated_at, \
                              snapshot_current_page, snapshot_page_count, \
                              snapshot_target_date, snapshot_rate_goal";

fn raw_book(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawBook> {
  Ok(RawBook {
    book_id:      row.get(0)?,
    reader_id:    row.get(1)?,
    title:        row.get(2)?,
    author:       row.get(3)?,
    page_count:   row.get(4)?,
    current_page: row.get(5)?,
    start_date:   row.get(6)?,
    target_date:  row.get(7)?,
    rate_goal:    row.get(8)?,
    archived_at:  row.get(9)?,
  })
}

fn raw_target(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTarget> {
  Ok(RawTarget {
    target_id:             row.get(0)?,
    book_id:               row.get(1)?,
    target_page:           row.get(2)?,
    calculated_at:         row.get(3)?,
    snapshot_current_page: row.get(4)?,
    snapshot_page_count:   row.get(5)?,
    snapshot_target_date:  row.get(6)?,
    snapshot_rate_goal:    row.get(7)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tome book store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`Book`] into the `books` table.
  async fn insert_book(&self, book: &Book) -> Result<()> {
    let book_id_str     = encode_uuid(book.book_id);
    let reader_id_str   = encode_uuid(book.reader_id);
    let title           = book.title.clone();
    let author          = book.author.clone();
    let page_count      = book.page_count;
    let current_page    = book.current_page;
    let start_date_str  = encode_dt(book.start_date);
    let target_date_str = encode_dt(book.target_date);
    let rate_goal       = book.rate_goal;
    let archived_at_str = book.archived_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO books (
             book_id, reader_id, title, author, page_count,
             current_page, start_date, target_date, rate_goal, archived_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            book_id_str,
            reader_id_str,
            title,
            author,
            page_count,
            current_page,
            start_date_str,
            target_date_str,
            rate_goal,
            archived_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a book after a mutation, converting a missing row into
  /// [`Error::BookNotFound`].
  async fn require_book(&self, book_id: Uuid) -> Result<Book> {
    self
      .get_book(book_id)
      .await?
      .ok_or(Error::BookNotFound(book_id))
  }
}

// ─── BookStore impl ──────────────────────────────────────────────────────────

impl BookStore for SqliteStore {
  type Error = Error;

  // ── Readers ───────────────────────────────────────────────────────────────

  async fn ensure_reader(&self, username: &str) -> Result<Reader> {
    let lookup = username.to_owned();
    let existing: Option<RawReader> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT reader_id, username, created_at FROM readers
             WHERE username = ?1",
            rusqlite::params![lookup],
            |row| {
              Ok(RawReader {
                reader_id:  row.get(0)?,
                username:   row.get(1)?,
                created_at: row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    if let Some(raw) = existing {
      return raw.into_reader();
    }

    let reader = Reader {
      reader_id:  Uuid::new_v4(),
      username:   username.to_owned(),
      created_at: Utc::now(),
    };

    let id_str   = encode_uuid(reader.reader_id);
    let name     = reader.username.clone();
    let at_str   = encode_dt(reader.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO readers (reader_id, username, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(reader)
  }

  // ── Books ─────────────────────────────────────────────────────────────────

  async fn add_book(&self, input: NewBook) -> Result<Book> {
    let book = Book {
      book_id:      Uuid::new_v4(),
      reader_id:    input.reader_id,
      title:        input.title,
      author:       input.author,
      page_count:   input.page_count,
      current_page: input.current_page,
      start_date:   Utc::now(),
      target_date:  input.target_date,
      rate_goal:    input.rate_goal,
      archived_at:  None,
    };

    self.insert_book(&book).await?;
    Ok(book)
  }

  async fn get_book(&self, id: Uuid) -> Result<Option<Book>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawBook> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {BOOK_COLUMNS} FROM books WHERE book_id = ?1"),
            rusqlite::params![id_str],
            raw_book,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawBook::into_book).transpose()
  }

  async fn list_books(
    &self,
    reader_id: Uuid,
    filter: BookFilter,
  ) -> Result<Vec<Book>> {
    let reader_id_str = encode_uuid(reader_id);
    let archive_clause = match filter {
      BookFilter::Active => "AND archived_at IS NULL",
      BookFilter::Archived => "AND archived_at IS NOT NULL",
      BookFilter::All => "",
    };

    let raws: Vec<RawBook> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {BOOK_COLUMNS} FROM books
           WHERE reader_id = ?1 {archive_clause}
           ORDER BY start_date"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![reader_id_str], raw_book)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBook::into_book).collect()
  }

  async fn update_progress(
    &self,
    book_id: Uuid,
    current_page: u32,
  ) -> Result<Book> {
    let id_str = encode_uuid(book_id);

    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE books SET current_page = ?2 WHERE book_id = ?1",
          rusqlite::params![id_str, current_page],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::BookNotFound(book_id));
    }
    self.require_book(book_id).await
  }

  async fn update_goal(
    &self,
    book_id: Uuid,
    target_date: DateTime<Utc>,
  ) -> Result<Book> {
    let id_str = encode_uuid(book_id);
    let date_str = encode_dt(target_date);

    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE books SET target_date = ?2 WHERE book_id = ?1",
          rusqlite::params![id_str, date_str],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::BookNotFound(book_id));
    }
    self.require_book(book_id).await
  }

  async fn set_archived(&self, book_id: Uuid, archived: bool) -> Result<Book> {
    let id_str = encode_uuid(book_id);
    let archived_at_str = archived.then(|| encode_dt(Utc::now()));

    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE books SET archived_at = ?2 WHERE book_id = ?1",
          rusqlite::params![id_str, archived_at_str],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::BookNotFound(book_id));
    }
    self.require_book(book_id).await
  }

  // ── Daily targets — append-only ───────────────────────────────────────────

  async fn latest_target(&self, book_id: Uuid) -> Result<Option<DailyTarget>> {
    let id_str = encode_uuid(book_id);

    let raw: Option<RawTarget> = self
      .conn
      .call(move |conn| {
        // rowid breaks same-instant ties so racing same-day writes resolve
        // to the last insert.
        Ok(conn
          .query_row(
            &format!(
              "SELECT {TARGET_COLUMNS} FROM daily_targets
               WHERE book_id = ?1
               ORDER BY calculated_at DESC, rowid DESC
               LIMIT 1"
            ),
            rusqlite::params![id_str],
            raw_target,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawTarget::into_target).transpose()
  }

  async fn record_target(&self, input: NewTarget) -> Result<DailyTarget> {
    let target = DailyTarget {
      target_id:     Uuid::new_v4(),
      book_id:       input.book_id,
      target_page:   input.target_page,
      calculated_at: input.calculated_at,
      snapshot:      input.snapshot,
    };

    let target_id_str   = encode_uuid(target.target_id);
    let book_id_str     = encode_uuid(target.book_id);
    let target_page     = target.target_page;
    let calc_at_str     = encode_dt(target.calculated_at);
    let snap_current    = target.snapshot.current_page;
    let snap_count      = target.snapshot.page_count;
    let snap_date_str   = encode_dt(target.snapshot.target_date);
    let snap_rate_goal  = target.snapshot.rate_goal;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO daily_targets (
             target_id, book_id, target_page, calculated_at,
             snapshot_current_page, snapshot_page_count,
             snapshot_target_date, snapshot_rate_goal
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            target_id_str,
            book_id_str,
            target_page,
            calc_at_str,
            snap_current,
            snap_count,
            snap_date_str,
            snap_rate_goal,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(target)
  }

  async fn target_history(&self, book_id: Uuid) -> Result<Vec<DailyTarget>> {
    let id_str = encode_uuid(book_id);

    let raws: Vec<RawTarget> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TARGET_COLUMNS} FROM daily_targets
           WHERE book_id = ?1
           ORDER BY calculated_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], raw_target)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTarget::into_target).collect()
  }
}
