use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::{limit_param, normalize_optional_field, now_iso, ContentRepoError, ContentStore};

const DEFAULT_SESSION: &str = "default";
const DEFAULT_SPEAKER: &str = "unknown";
const DEFAULT_MESSAGE_TYPE: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationTurnRecord {
    pub id: i64,
    pub session_id: String,
    pub speaker: String,
    pub message: String,
    pub message_type: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppendConversationInput {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub message_type: Option<String>,
}

impl ContentStore {
    /// Appends a turn; every field is optional and `session_id` is not
    /// checked against anything.
    pub fn append_conversation_turn(
        &self,
        input: AppendConversationInput,
    ) -> Result<i64, ContentRepoError> {
        let session_id = normalize_optional_field(input.session_id.as_deref(), DEFAULT_SESSION);
        let speaker = normalize_optional_field(input.speaker.as_deref(), DEFAULT_SPEAKER);
        let message = input.message.unwrap_or_default();
        let message_type =
            normalize_optional_field(input.message_type.as_deref(), DEFAULT_MESSAGE_TYPE);

        self.with_connection(|conn| {
            conn.execute(
                "
                INSERT INTO conversation_history
                  (session_id, speaker, message, message_type, created_at)
                VALUES
                  (?1, ?2, ?3, ?4, ?5)
            ",
                params![session_id, speaker, message, message_type, now_iso()],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn conversation_turns(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationTurnRecord>, ContentRepoError> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "
                SELECT id, session_id, speaker, message, message_type, created_at
                FROM (
                  SELECT id, session_id, speaker, message, message_type, created_at
                  FROM conversation_history
                  WHERE session_id = ?1
                  ORDER BY id DESC
                  LIMIT ?2
                )
                ORDER BY id ASC
            ",
            )?;
            let rows = stmt.query_map(params![session_id, limit_param(limit)], |row| {
                Ok(ConversationTurnRecord {
                    id: row.get("id")?,
                    session_id: row.get("session_id")?,
                    speaker: row.get("speaker")?,
                    message: row.get("message")?,
                    message_type: row.get("message_type")?,
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
