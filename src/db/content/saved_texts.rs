use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::{
    limit_param, normalize_optional_field, normalize_required_text, now_iso, ContentRepoError,
    ContentStore,
};

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_CATEGORY: &str = "general";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedTextRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveTextInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl ContentStore {
    pub fn insert_saved_text(&self, input: SaveTextInput) -> Result<i64, ContentRepoError> {
        let content = normalize_required_text(input.content.as_str(), "No content provided")?;
        let title = normalize_optional_field(input.title.as_deref(), DEFAULT_TITLE);
        let category = normalize_optional_field(input.category.as_deref(), DEFAULT_CATEGORY);

        self.with_connection(|conn| {
            conn.execute(
                "
                INSERT INTO saved_texts (title, content, category, created_at)
                VALUES (?1, ?2, ?3, ?4)
            ",
                params![title, content, category, now_iso()],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn recent_saved_texts(&self, limit: usize) -> Result<Vec<SavedTextRecord>, ContentRepoError> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "
                SELECT id, title, content, category, created_at
                FROM saved_texts
                ORDER BY created_at DESC, id DESC
                LIMIT ?1
            ",
            )?;
            let rows = stmt.query_map(params![limit_param(limit)], |row| {
                Ok(SavedTextRecord {
                    id: row.get("id")?,
                    title: row.get("title")?,
                    content: row.get("content")?,
                    category: row.get("category")?,
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
