use crate::models::{
    format_timestamp, FolderPreview, PhotoCategory, PhotoRecord, RECORD_COLUMNS, UNKNOWN_PLATE,
};
use crate::schema::init_plate_schema;
use chrono::{SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Error type for photo store operations
#[derive(Debug)]
pub enum PhotoStoreError {
    /// Rejected input, nothing was written
    Validation(String),
    DatabaseError(rusqlite::Error),
    IoError(std::io::Error),
    /// A previous holder of the connection panicked
    LockPoisoned,
}

impl std::fmt::Display for PhotoStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhotoStoreError::Validation(msg) => write!(f, "Validation error: {}", msg),
            PhotoStoreError::DatabaseError(e) => write!(f, "Database error: {}", e),
            PhotoStoreError::IoError(e) => write!(f, "IO error: {}", e),
            PhotoStoreError::LockPoisoned => write!(f, "Database connection lock poisoned"),
        }
    }
}

impl std::error::Error for PhotoStoreError {}

impl From<rusqlite::Error> for PhotoStoreError {
    fn from(err: rusqlite::Error) -> Self {
        PhotoStoreError::DatabaseError(err)
    }
}

impl From<std::io::Error> for PhotoStoreError {
    fn from(err: std::io::Error) -> Self {
        PhotoStoreError::IoError(err)
    }
}

/// Durable store of photo records grouped by plate.
///
/// Every operation holds the connection lock for its whole duration, so writes
/// are serialized and readers never see half of a folder delete. Nothing is
/// cached; each read goes to the database.
#[derive(Clone)]
pub struct PhotoStore {
    conn: Arc<Mutex<Connection>>,
}

impl PhotoStore {
    /// Opens (or creates) the database file and makes sure the schema exists
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, PhotoStoreError> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        log::debug!("Opening photo store at {:?}", db_path);
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    /// In-memory store, mostly useful for tests
    pub fn open_in_memory() -> Result<Self, PhotoStoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wraps an already opened connection
    pub fn from_connection(conn: Connection) -> Result<Self, PhotoStoreError> {
        init_plate_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, PhotoStoreError> {
        self.conn.lock().map_err(|_| PhotoStoreError::LockPoisoned)
    }

    /// Persists a new photo record.
    ///
    /// The plate text is stored as given (callers normalize it); an empty plate
    /// is stored as [`UNKNOWN_PLATE`].
    pub fn insert(
        &self,
        image_uri: &str,
        asset_id: &str,
        category: PhotoCategory,
        plate_text: &str,
    ) -> Result<PhotoRecord, PhotoStoreError> {
        if image_uri.trim().is_empty() {
            return Err(PhotoStoreError::Validation(
                "Image uri must not be empty".to_string(),
            ));
        }

        let plate_text = if plate_text.is_empty() {
            UNKNOWN_PLATE
        } else {
            plate_text
        };
        let created_at = Utc::now().trunc_subsecs(3);

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO images (imageUri, assetId, category, detectedText, date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                image_uri,
                asset_id,
                category.as_str(),
                plate_text,
                format_timestamp(&created_at),
            ],
        )?;
        let id = conn.last_insert_rowid();

        log::info!("Saved photo {} for plate {}", id, plate_text);

        Ok(PhotoRecord {
            id,
            image_uri: image_uri.to_string(),
            asset_id: asset_id.to_string(),
            category,
            plate_text: plate_text.to_string(),
            created_at,
        })
    }

    /// Loads a single record
    pub fn get(&self, id: i64) -> Result<Option<PhotoRecord>, PhotoStoreError> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                &format!("SELECT {} FROM images WHERE id = ?1", RECORD_COLUMNS),
                params![id],
                |row| PhotoRecord::try_from(row),
            )
            .optional()?;

        Ok(record)
    }

    /// One preview per plate, most recently active plate first.
    ///
    /// Rows without plate text are left out; they stay in the table but belong
    /// to no folder.
    pub fn list_folders(&self) -> Result<Vec<FolderPreview>, PhotoStoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT i.detectedText, i.imageUri
             FROM images i
             JOIN (
                 SELECT MAX(id) AS latest_id
                 FROM images
                 WHERE detectedText IS NOT NULL AND detectedText != ''
                 GROUP BY detectedText
             ) g ON g.latest_id = i.id
             ORDER BY i.id DESC",
        )?;

        let folders = stmt
            .query_map([], |row| {
                Ok(FolderPreview {
                    plate: row.get(0)?,
                    cover_image_uri: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(folders)
    }

    /// All photos of one plate, newest first
    pub fn list_by_plate(&self, plate: &str) -> Result<Vec<PhotoRecord>, PhotoStoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM images WHERE detectedText = ?1 ORDER BY id DESC",
            RECORD_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![plate], |row| PhotoRecord::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Case-insensitive substring search over plate text and category, newest first
    pub fn search(&self, query: &str) -> Result<Vec<PhotoRecord>, PhotoStoreError> {
        let pattern = like_pattern(query);

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM images
             WHERE detectedText LIKE ?1 ESCAPE '\\' OR category LIKE ?1 ESCAPE '\\'
             ORDER BY id DESC",
            RECORD_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![pattern], |row| PhotoRecord::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Every record, newest first
    pub fn list_all(&self) -> Result<Vec<PhotoRecord>, PhotoStoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM images ORDER BY id DESC",
            RECORD_COLUMNS
        ))?;

        let records = stmt
            .query_map([], |row| PhotoRecord::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    pub fn count(&self) -> Result<i64, PhotoStoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Deletes one record. Deleting an id that no longer exists is a no-op.
    ///
    /// The external asset is not touched; callers delete it first.
    pub fn delete_record(&self, id: i64) -> Result<usize, PhotoStoreError> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM images WHERE id = ?1", params![id])?;

        if rows == 0 {
            log::debug!("Photo {} already deleted", id);
        }

        Ok(rows)
    }

    /// Deletes every record of a plate in one transaction
    pub fn delete_folder(&self, plate: &str) -> Result<usize, PhotoStoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let rows = tx.execute("DELETE FROM images WHERE detectedText = ?1", params![plate])?;
        tx.commit()?;

        log::info!("Deleted folder {} ({} photos)", plate, rows);

        Ok(rows)
    }

    /// Deletes exactly the given records in one transaction. Missing ids are skipped.
    pub fn delete_records(&self, ids: &[i64]) -> Result<usize, PhotoStoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut rows = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM images WHERE id = ?1")?;
            for id in ids {
                rows += stmt.execute(params![id])?;
            }
        }
        tx.commit()?;

        log::debug!("Deleted {} of {} photos", rows, ids.len());

        Ok(rows)
    }
}

/// Builds a LIKE pattern that matches `query` literally anywhere in the column
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
