use std::path::PathBuf;

pub const DB_FILE_NAME: &str = "jobtrack.db";
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Runtime settings. Flag and environment values are merged by the CLI
/// parser before they get here; this fills in the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_filter: Option<String>,
}

impl Config {
    pub fn resolve(db_path: Option<PathBuf>, log_filter: Option<String>) -> Self {
        Self {
            db_path: db_path.unwrap_or_else(default_db_path),
            log_filter: log_filter.filter(|f| !f.trim().is_empty()),
        }
    }
}

pub fn default_db_path() -> PathBuf {
    // Use XDG data directory or fallback
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobtrack") {
        proj_dirs.data_dir().join(DB_FILE_NAME)
    } else {
        PathBuf::from(DB_FILE_NAME)
    }
}
