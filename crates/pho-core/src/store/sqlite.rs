//! SQLite record store.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Params, Row, Transaction};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::types::{AlbumRef, CatalogImage, RecordState, RenditionPaths, UploadRecord};

use super::{RecordStore, StoreTx};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS stored_image (
    seq           INTEGER PRIMARY KEY AUTOINCREMENT,
    id            TEXT NOT NULL UNIQUE,
    upload_path   TEXT,
    orig_path     TEXT,
    thumb_path    TEXT,
    display_path  TEXT,
    uploaded_at   TEXT NOT NULL,
    processed_at  TEXT
);

CREATE INDEX IF NOT EXISTS idx_stored_image_processed_at
    ON stored_image(processed_at);

CREATE TABLE IF NOT EXISTS album (
    id    TEXT PRIMARY KEY,
    name  TEXT NOT NULL UNIQUE,
    url   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS image (
    id           TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    url_name     TEXT NOT NULL,
    description  TEXT NOT NULL,
    album_id     TEXT NOT NULL REFERENCES album(id),
    store_id     TEXT NOT NULL REFERENCES stored_image(id)
);
"#;

const RECORD_COLUMNS: &str =
    "id, upload_path, orig_path, thumb_path, display_path, uploaded_at, processed_at";

/// Record store backed by a single SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Backend(format!("{}: {e}", parent.display())))?;
        }
        let conn = Connection::open(path)?;
        tracing::debug!("Opened record store at {}", path.display());
        Self::with_connection(conn)
    }

    /// A private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn query_records<P: Params>(&self, filter: &str, params: P) -> StoreResult<Vec<UploadRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM stored_image {filter} ORDER BY seq");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params, RecordRow::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }
}

impl RecordStore for SqliteStore {
    fn find_pending(&self) -> StoreResult<Vec<UploadRecord>> {
        self.query_records("WHERE processed_at IS NULL", [])
    }

    fn find_processed(&self) -> StoreResult<Vec<UploadRecord>> {
        self.query_records("WHERE processed_at IS NOT NULL", [])
    }

    fn get(&self, id: Uuid) -> StoreResult<Option<UploadRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM stored_image WHERE id = ?1");
        let row = self
            .conn
            .query_row(&sql, [id.to_string()], RecordRow::from_row)
            .optional()?;
        row.map(RecordRow::into_record).transpose()
    }

    fn save(&mut self, record: &UploadRecord) -> StoreResult<()> {
        upsert_record(&self.conn, record)
    }

    fn find_album_by_name(&self, name: &str) -> StoreResult<AlbumRef> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, url FROM album WHERE name = ?1",
                [name],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let (id, name, url) = row.ok_or_else(|| StoreError::AlbumNotFound(name.to_string()))?;
        Ok(AlbumRef {
            id: parse_uuid(&id)?,
            name,
            url,
        })
    }

    fn create_album(&mut self, name: &str) -> StoreResult<AlbumRef> {
        match self.find_album_by_name(name) {
            Ok(existing) => return Ok(existing),
            Err(StoreError::AlbumNotFound(_)) => {}
            Err(e) => return Err(e),
        }
        let album = AlbumRef::new(name);
        self.conn.execute(
            "INSERT INTO album (id, name, url) VALUES (?1, ?2, ?3)",
            params![album.id.to_string(), album.name, album.url],
        )?;
        tracing::info!("Created album {:?}", album.name);
        Ok(album)
    }

    fn catalog(&self) -> StoreResult<Vec<CatalogImage>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, url_name, description, album_id, store_id
             FROM image ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut images = Vec::new();
        for row in rows {
            let (id, name, url_name, description, album_id, store_id) = row?;
            images.push(CatalogImage {
                id: parse_uuid(&id)?,
                name,
                url_name,
                description,
                album_id: parse_uuid(&album_id)?,
                store_id: parse_uuid(&store_id)?,
            });
        }
        Ok(images)
    }

    fn begin(&mut self) -> StoreResult<Box<dyn StoreTx + '_>> {
        let tx = self.conn.transaction()?;
        Ok(Box::new(SqliteTx { tx }))
    }
}

/// Wraps a rusqlite transaction, which rolls back when dropped.
struct SqliteTx<'c> {
    tx: Transaction<'c>,
}

impl StoreTx for SqliteTx<'_> {
    fn save(&mut self, record: &UploadRecord) -> StoreResult<()> {
        upsert_record(&self.tx, record)
    }

    fn insert_image(&mut self, image: &CatalogImage) -> StoreResult<()> {
        self.tx.execute(
            "INSERT INTO image (id, name, url_name, description, album_id, store_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                image.id.to_string(),
                image.name,
                image.url_name,
                image.description,
                image.album_id.to_string(),
                image.store_id.to_string(),
            ],
        )?;
        Ok(())
    }

    fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit()?;
        Ok(())
    }

    fn rollback(self: Box<Self>) -> StoreResult<()> {
        self.tx.rollback()?;
        Ok(())
    }
}

fn upsert_record(conn: &Connection, record: &UploadRecord) -> StoreResult<()> {
    let row = RecordRow::from_record(record);
    conn.execute(
        "INSERT INTO stored_image
             (id, upload_path, orig_path, thumb_path, display_path, uploaded_at, processed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
             upload_path = excluded.upload_path,
             orig_path = excluded.orig_path,
             thumb_path = excluded.thumb_path,
             display_path = excluded.display_path,
             uploaded_at = excluded.uploaded_at,
             processed_at = excluded.processed_at",
        params![
            row.id,
            row.upload_path,
            row.orig_path,
            row.thumb_path,
            row.display_path,
            row.uploaded_at,
            row.processed_at,
        ],
    )?;
    Ok(())
}

/// Column-level view of an upload record.
struct RecordRow {
    id: String,
    upload_path: Option<String>,
    orig_path: Option<String>,
    thumb_path: Option<String>,
    display_path: Option<String>,
    uploaded_at: String,
    processed_at: Option<String>,
}

impl RecordRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            upload_path: row.get(1)?,
            orig_path: row.get(2)?,
            thumb_path: row.get(3)?,
            display_path: row.get(4)?,
            uploaded_at: row.get(5)?,
            processed_at: row.get(6)?,
        })
    }

    fn from_record(record: &UploadRecord) -> Self {
        let mut row = Self {
            id: record.id.to_string(),
            upload_path: None,
            orig_path: None,
            thumb_path: None,
            display_path: None,
            uploaded_at: format_timestamp(record.uploaded_at),
            processed_at: None,
        };
        match &record.state {
            RecordState::Pending { upload_path } => {
                row.upload_path = Some(path_text(upload_path));
            }
            RecordState::Processed {
                paths,
                processed_at,
            } => {
                row.orig_path = Some(path_text(&paths.orig_path));
                row.thumb_path = Some(path_text(&paths.thumb_path));
                row.display_path = Some(path_text(&paths.display_path));
                row.processed_at = Some(format_timestamp(*processed_at));
            }
        }
        row
    }

    /// Rebuild the record, rejecting any column combination that is neither
    /// a pending nor a processed record.
    fn into_record(self) -> StoreResult<UploadRecord> {
        let id = parse_uuid(&self.id)?;
        let uploaded_at = parse_timestamp(&self.id, &self.uploaded_at)?;

        let state = match (
            self.upload_path,
            self.orig_path,
            self.display_path,
            self.thumb_path,
            self.processed_at,
        ) {
            (Some(upload_path), None, None, None, None) => RecordState::Pending {
                upload_path: PathBuf::from(upload_path),
            },
            (None, Some(orig), Some(display), Some(thumb), Some(processed_at)) => {
                RecordState::Processed {
                    paths: RenditionPaths {
                        orig_path: PathBuf::from(orig),
                        display_path: PathBuf::from(display),
                        thumb_path: PathBuf::from(thumb),
                    },
                    processed_at: parse_timestamp(&self.id, &processed_at)?,
                }
            }
            _ => {
                return Err(StoreError::Corrupt {
                    id: self.id,
                    message: "record is neither pending nor fully processed".into(),
                })
            }
        };

        Ok(UploadRecord {
            id,
            uploaded_at,
            state,
        })
    }
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(id: &str, text: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt {
            id: id.to_string(),
            message: format!("bad timestamp {text:?}: {e}"),
        })
}

fn parse_uuid(text: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(text).map_err(|e| StoreError::Corrupt {
        id: text.to_string(),
        message: e.to_string(),
    })
}
