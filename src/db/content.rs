mod conversations;
mod descriptions;
mod preferences;
mod saved_texts;
mod transcriptions;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection};
use thiserror::Error;

pub use conversations::{AppendConversationInput, ConversationTurnRecord};
pub use descriptions::ImageDescriptionRecord;
pub use preferences::preference_value_to_text;
pub use saved_texts::{SaveTextInput, SavedTextRecord};
pub use transcriptions::{SaveTranscriptionInput, TranscriptionRecord};

pub const RECENT_LIMIT: usize = 50;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ContentRepoError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Record kinds that may be removed through the delete endpoint.
///
/// Each kind owns a fixed statement, so a table name coming from a URL
/// never reaches SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeletableRecord {
    ImageDescription,
    Transcription,
    SavedText,
}

impl DeletableRecord {
    pub const ALL: [Self; 3] = [Self::ImageDescription, Self::Transcription, Self::SavedText];

    pub fn table_name(self) -> &'static str {
        match self {
            Self::ImageDescription => "image_descriptions",
            Self::Transcription => "transcriptions",
            Self::SavedText => "saved_texts",
        }
    }

    fn delete_sql(self) -> &'static str {
        match self {
            Self::ImageDescription => "DELETE FROM image_descriptions WHERE id = ?1",
            Self::Transcription => "DELETE FROM transcriptions WHERE id = ?1",
            Self::SavedText => "DELETE FROM saved_texts WHERE id = ?1",
        }
    }
}

impl fmt::Display for DeletableRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for DeletableRecord {
    type Err = ContentRepoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.table_name() == value)
            .ok_or_else(|| ContentRepoError::Validation(String::from("Invalid table")))
    }
}

/// SQLite-backed store for descriptions, transcriptions, saved texts,
/// conversation turns and preferences.
///
/// One connection is opened up front and shared behind a mutex; SQLite's
/// own locking covers other processes touching the same file.
#[derive(Debug)]
pub struct ContentStore {
    db_path: PathBuf,
    conn: Mutex<Connection>,
}

impl ContentStore {
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, ContentRepoError> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                ContentRepoError::Internal(format!(
                    "could not create database directory {}: {error}",
                    parent.display()
                ))
            })?;
        }
        let conn = Connection::open(db_path.as_path())?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(Self {
            db_path,
            conn: Mutex::new(conn),
        })
    }

    pub fn initialize(&self) -> Result<(), ContentRepoError> {
        self.with_connection(ensure_schema)
    }

    pub fn db_path(&self) -> &Path {
        self.db_path.as_path()
    }

    pub fn delete_record(&self, kind: DeletableRecord, id: i64) -> Result<usize, ContentRepoError> {
        self.with_connection(|conn| Ok(conn.execute(kind.delete_sql(), params![id])?))
    }

    fn with_connection<T, F>(&self, func: F) -> Result<T, ContentRepoError>
    where
        F: FnOnce(&Connection) -> Result<T, ContentRepoError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| ContentRepoError::Internal(String::from("database connection lock poisoned")))?;
        func(&conn)
    }

    fn with_connection_mut<T, F>(&self, func: F) -> Result<T, ContentRepoError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ContentRepoError>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| ContentRepoError::Internal(String::from("database connection lock poisoned")))?;
        func(&mut conn)
    }
}

fn ensure_schema(conn: &Connection) -> Result<(), ContentRepoError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS image_descriptions (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          filename TEXT NOT NULL,
          description TEXT NOT NULL,
          created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS transcriptions (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          text TEXT NOT NULL,
          source TEXT NOT NULL DEFAULT 'speech',
          created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_preferences (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          preference_key TEXT NOT NULL UNIQUE,
          preference_value TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS saved_texts (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          title TEXT NOT NULL DEFAULT 'Untitled',
          content TEXT NOT NULL,
          category TEXT NOT NULL DEFAULT 'general',
          created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS conversation_history (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          session_id TEXT NOT NULL,
          speaker TEXT NOT NULL,
          message TEXT NOT NULL,
          message_type TEXT NOT NULL DEFAULT 'text',
          created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_conversation_history_session
          ON conversation_history(session_id);
    ",
    )?;
    Ok(())
}

fn now_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn normalize_required_text(value: &str, message: &str) -> Result<String, ContentRepoError> {
    if value.trim().is_empty() {
        return Err(ContentRepoError::Validation(message.to_string()));
    }
    Ok(value.to_string())
}

fn normalize_optional_field(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use uuid::Uuid;

    use super::ContentStore;

    pub fn temp_store() -> ContentStore {
        let suffix = Uuid::new_v4().to_string();
        let root = std::env::temp_dir().join(format!("accessibridge_repo_{suffix}"));
        let store =
            ContentStore::open(root.join("var/accessibility.db")).expect("store should open");
        store.initialize().expect("schema should initialize");
        store
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::temp_store;
    use super::*;

    #[test]
    fn initialize_is_idempotent() {
        let store = temp_store();
        store.initialize().expect("second initialize should succeed");
        store.initialize().expect("third initialize should succeed");

        let tables = store
            .with_connection(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
                let mut out = Vec::new();
                for row in rows {
                    out.push(row?);
                }
                Ok(out)
            })
            .expect("tables should list");
        assert_eq!(
            tables,
            vec![
                "conversation_history",
                "image_descriptions",
                "saved_texts",
                "transcriptions",
                "user_preferences",
            ]
        );
    }

    #[test]
    fn deletable_record_parses_only_allowed_tables() {
        assert_eq!(
            "image_descriptions".parse::<DeletableRecord>().ok(),
            Some(DeletableRecord::ImageDescription)
        );
        assert_eq!(
            "transcriptions".parse::<DeletableRecord>().ok(),
            Some(DeletableRecord::Transcription)
        );
        assert_eq!(
            "saved_texts".parse::<DeletableRecord>().ok(),
            Some(DeletableRecord::SavedText)
        );
        for rejected in ["users", "user_preferences", "conversation_history", "saved_texts; --"] {
            let error = rejected
                .parse::<DeletableRecord>()
                .expect_err("table should be rejected");
            assert_eq!(error.to_string(), "Invalid table");
        }
    }

    #[test]
    fn delete_missing_id_affects_no_rows() {
        let store = temp_store();
        for kind in DeletableRecord::ALL {
            let affected = store
                .delete_record(kind, 9_999)
                .expect("deleting a missing row should succeed");
            assert_eq!(affected, 0, "{kind} delete should be a no-op");
        }
    }

    #[test]
    fn delete_removes_only_the_targeted_row() {
        let store = temp_store();
        let first = store
            .insert_image_description("cat.png", "A cat on a mat.")
            .expect("insert should succeed");
        let second = store
            .insert_image_description("dog.png", "A dog in a park.")
            .expect("insert should succeed");

        let affected = store
            .delete_record(DeletableRecord::ImageDescription, first)
            .expect("delete should succeed");
        assert_eq!(affected, 1);

        let remaining = store
            .recent_image_descriptions(RECENT_LIMIT)
            .expect("descriptions should list");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second);
    }

    #[test]
    fn optional_fields_fall_back_to_default_when_blank() {
        assert_eq!(normalize_optional_field(None, "speech"), "speech");
        assert_eq!(normalize_optional_field(Some("  "), "speech"), "speech");
        assert_eq!(normalize_optional_field(Some(" sign "), "speech"), "sign");
    }
}
