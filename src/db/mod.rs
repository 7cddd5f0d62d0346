pub mod content;

use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE: &str = "accessibility.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub app_db_path: PathBuf,
}

impl DbConfig {
    pub fn new(app_db_path: impl Into<PathBuf>) -> Self {
        Self {
            app_db_path: app_db_path.into(),
        }
    }
}

pub fn resolve_db_config(working_dir: &Path) -> DbConfig {
    let sqlite_path = std::env::var("ACCESSIBRIDGE_DB").ok();
    select_db_config(sqlite_path.as_deref(), working_dir)
}

fn select_db_config(sqlite_path: Option<&str>, working_dir: &Path) -> DbConfig {
    let sqlite_raw = sqlite_path
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| String::from(DEFAULT_DB_FILE));
    let sqlite_candidate = PathBuf::from(sqlite_raw);
    let sqlite_abs = if sqlite_candidate.is_absolute() {
        sqlite_candidate
    } else {
        working_dir.join(sqlite_candidate)
    };
    DbConfig::new(sqlite_abs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_accessibility_db_in_working_dir() {
        let cfg = select_db_config(None, Path::new("/srv/app"));
        assert_eq!(cfg.app_db_path, PathBuf::from("/srv/app/accessibility.db"));
    }

    #[test]
    fn blank_override_is_ignored() {
        let cfg = select_db_config(Some("   "), Path::new("/srv/app"));
        assert_eq!(cfg.app_db_path, PathBuf::from("/srv/app/accessibility.db"));
    }

    #[test]
    fn absolute_override_is_kept_and_relative_is_joined() {
        let abs = select_db_config(Some("/var/lib/bridge.db"), Path::new("/srv/app"));
        assert_eq!(abs.app_db_path, PathBuf::from("/var/lib/bridge.db"));

        let rel = select_db_config(Some("var/bridge.db"), Path::new("/srv/app"));
        assert_eq!(rel.app_db_path, PathBuf::from("/srv/app/var/bridge.db"));
    }
}
