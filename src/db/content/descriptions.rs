use rusqlite::params;
use serde::Serialize;

use super::{limit_param, normalize_required_text, now_iso, ContentRepoError, ContentStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageDescriptionRecord {
    pub id: i64,
    pub filename: String,
    pub description: String,
    pub created_at: String,
}

impl ContentStore {
    pub fn insert_image_description(
        &self,
        filename: &str,
        description: &str,
    ) -> Result<i64, ContentRepoError> {
        let filename = normalize_required_text(filename, "No image selected")?;

        self.with_connection(|conn| {
            conn.execute(
                "
                INSERT INTO image_descriptions (filename, description, created_at)
                VALUES (?1, ?2, ?3)
            ",
                params![filename, description, now_iso()],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn recent_image_descriptions(
        &self,
        limit: usize,
    ) -> Result<Vec<ImageDescriptionRecord>, ContentRepoError> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "
                SELECT id, filename, description, created_at
                FROM image_descriptions
                ORDER BY created_at DESC, id DESC
                LIMIT ?1
            ",
            )?;
            let rows = stmt.query_map(params![limit_param(limit)], row_to_image_description)?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }
}

fn row_to_image_description(row: &rusqlite::Row<'_>) -> rusqlite::Result<ImageDescriptionRecord> {
    Ok(ImageDescriptionRecord {
        id: row.get("id")?,
        filename: row.get("filename")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
    })
}
