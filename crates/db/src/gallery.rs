//! Store for the `photos` table.
//!
//! [`GalleryStore`] is a single owned handle over one SQLite file. Creating
//! it does no I/O: the database is opened (and migrated) on the first
//! operation, and a failed open is retried on the next one. [`close`]
//! releases the connection explicitly.
//!
//! [`close`]: GalleryStore::close

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use photobooth_core::gallery::{GalleryRecord, NewGalleryRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tokio::sync::OnceCell;

/// Column list for `photos` queries.
const COLUMNS: &str = "\
    id, original_image_data, transformed_image_data, \
    theme_id, theme_name, theme_icon, created_at";

/// Source of `created_at` values, in milliseconds since the Unix epoch.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Errors from the gallery store. Both variants are persistence failures
/// from the caller's point of view.
#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    /// The database could not be opened or its schema applied.
    #[error("Gallery storage unavailable at {path}: {reason}")]
    Unavailable { path: String, reason: String },

    /// A read or write against the open database failed.
    #[error("Gallery persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

/// A row from the `photos` table.
#[derive(Debug, FromRow)]
struct PhotoRow {
    id: String,
    original_image_data: String,
    transformed_image_data: String,
    theme_id: String,
    theme_name: String,
    theme_icon: String,
    created_at: i64,
}

impl From<PhotoRow> for GalleryRecord {
    fn from(row: PhotoRow) -> Self {
        GalleryRecord {
            id: row.id,
            original_image_data: row.original_image_data,
            transformed_image_data: row.transformed_image_data,
            theme_id: row.theme_id,
            theme_name: row.theme_name,
            theme_icon: row.theme_icon,
            created_at: row.created_at,
        }
    }
}

/// Owned handle to the on-device gallery.
pub struct GalleryStore {
    path: PathBuf,
    pool: OnceCell<SqlitePool>,
    clock: Clock,
}

impl fmt::Debug for GalleryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GalleryStore")
            .field("path", &self.path)
            .field("open", &self.pool.initialized())
            .finish()
    }
}

impl GalleryStore {
    /// Create a handle for the database at `path`. Nothing is opened yet.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool: OnceCell::new(),
            clock: Arc::new(|| chrono::Utc::now().timestamp_millis()),
        }
    }

    /// Replace the clock used to stamp `created_at`.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the underlying connection. Pending operations finish first.
    pub async fn close(self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            tracing::debug!(path = %self.path.display(), "Gallery store closed");
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// All records, newest first. Never fails: if the store cannot be read
    /// the error is logged and an empty list is returned so the caller can
    /// render an empty gallery.
    pub async fn list(&self) -> Vec<GalleryRecord> {
        match self.try_list().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, path = %self.path.display(), "Failed to load gallery photos");
                Vec::new()
            }
        }
    }

    /// All records, newest first, surfacing any storage error.
    ///
    /// Records sharing a timestamp are ordered by insertion, newest first.
    pub async fn try_list(&self) -> Result<Vec<GalleryRecord>, GalleryError> {
        let pool = self.pool().await?;
        let query = format!("SELECT {COLUMNS} FROM photos ORDER BY created_at DESC, rowid DESC");
        let rows = sqlx::query_as::<_, PhotoRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(GalleryRecord::from).collect())
    }

    /// Find a single record by id.
    pub async fn get(&self, id: &str) -> Result<Option<GalleryRecord>, GalleryError> {
        let pool = self.pool().await?;
        let query = format!("SELECT {COLUMNS} FROM photos WHERE id = ?");
        let row = sqlx::query_as::<_, PhotoRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(GalleryRecord::from))
    }

    /// Number of saved records.
    pub async fn count(&self) -> Result<i64, GalleryError> {
        let pool = self.pool().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM photos")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Persist a new record with a fresh id and the current time.
    pub async fn save(&self, new: NewGalleryRecord) -> Result<GalleryRecord, GalleryError> {
        let pool = self.pool().await?;
        let record = new.into_record(uuid::Uuid::new_v4().to_string(), (self.clock)());

        let query = format!("INSERT INTO photos ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)");
        sqlx::query(&query)
            .bind(&record.id)
            .bind(&record.original_image_data)
            .bind(&record.transformed_image_data)
            .bind(&record.theme_id)
            .bind(&record.theme_name)
            .bind(&record.theme_icon)
            .bind(record.created_at)
            .execute(pool)
            .await?;

        tracing::info!(
            id = %record.id,
            theme_id = %record.theme_id,
            created_at = record.created_at,
            "Photo saved to gallery",
        );

        Ok(record)
    }

    /// Delete a record. Deleting an unknown id is a no-op.
    pub async fn delete_by_id(&self, id: &str) -> Result<(), GalleryError> {
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM photos WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        tracing::debug!(id, removed = result.rows_affected(), "Gallery delete");
        Ok(())
    }

    /// Delete every record. Returns how many were removed.
    pub async fn clear_all(&self) -> Result<u64, GalleryError> {
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM photos").execute(pool).await?;

        tracing::info!(removed = result.rows_affected(), "Gallery cleared");
        Ok(result.rows_affected())
    }

    // ---- private helpers ----

    /// The open pool, opening and migrating the database on first use.
    async fn pool(&self) -> Result<&SqlitePool, GalleryError> {
        self.pool.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> Result<SqlitePool, GalleryError> {
        let unavailable = |reason: String| GalleryError::Unavailable {
            path: self.path.display().to_string(),
            reason,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| unavailable(format!("cannot create directory: {e}")))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        // Single connection: every gallery operation is serialized through it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| unavailable(format!("migration failed: {e}")))?;

        tracing::info!(path = %self.path.display(), "Gallery store opened");
        Ok(pool)
    }
}
