use std::collections::BTreeMap;

use rusqlite::params;
use serde_json::Value;

use super::{now_iso, ContentRepoError, ContentStore};

impl ContentStore {
    pub fn list_preferences(&self) -> Result<BTreeMap<String, String>, ContentRepoError> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "
                SELECT preference_key, preference_value
                FROM user_preferences
                ORDER BY preference_key ASC
            ",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            let mut out = BTreeMap::new();
            for row in rows {
                let (key, value) = row?;
                out.insert(key, value);
            }
            Ok(out)
        })
    }

    pub fn upsert_preference(&self, key: &str, value: &str) -> Result<(), ContentRepoError> {
        self.upsert_preferences([(key.to_string(), value.to_string())])
    }

    /// Replaces every key in `entries` inside one transaction.
    pub fn upsert_preferences<I>(&self, entries: I) -> Result<(), ContentRepoError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.with_connection_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "
                    INSERT OR REPLACE INTO user_preferences
                      (preference_key, preference_value, updated_at)
                    VALUES
                      (?1, ?2, ?3)
                ",
                )?;
                let now = now_iso();
                for (key, value) in entries {
                    if key.trim().is_empty() {
                        return Err(ContentRepoError::Validation(String::from(
                            "Preference keys must not be empty",
                        )));
                    }
                    stmt.execute(params![key, value, now])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }
}

/// Strings are stored verbatim; any other JSON value is stored as its JSON text,
/// so `true` is kept as `"true"` and `null` as `"null"`, never `True`/`None`.
/// The page scripts compare against the JSON spellings.
pub fn preference_value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
