use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::{
    limit_param, normalize_optional_field, normalize_required_text, now_iso, ContentRepoError,
    ContentStore,
};

const DEFAULT_SOURCE: &str = "speech";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptionRecord {
    pub id: i64,
    pub text: String,
    pub source: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveTranscriptionInput {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub source: Option<String>,
}

impl ContentStore {
    pub fn insert_transcription(
        &self,
        input: SaveTranscriptionInput,
    ) -> Result<i64, ContentRepoError> {
        let text = normalize_required_text(input.text.as_str(), "No text provided")?;
        let source = normalize_optional_field(input.source.as_deref(), DEFAULT_SOURCE);

        self.with_connection(|conn| {
            conn.execute(
                "
                INSERT INTO transcriptions (text, source, created_at)
                VALUES (?1, ?2, ?3)
            ",
                params![text, source, now_iso()],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn recent_transcriptions(
        &self,
        limit: usize,
    ) -> Result<Vec<TranscriptionRecord>, ContentRepoError> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "
                SELECT id, text, source, created_at
                FROM transcriptions
                ORDER BY created_at DESC, id DESC
                LIMIT ?1
            ",
            )?;
            let rows = stmt.query_map(params![limit_param(limit)], |row| {
                Ok(TranscriptionRecord {
                    id: row.get("id")?,
                    text: row.get("text")?,
                    source: row.get("source")?,
                    created_at: row.get("created_at")?,
                })
            })?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }
}
