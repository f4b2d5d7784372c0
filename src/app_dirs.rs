use directories::ProjectDirs;
use std::env;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dinotype").map(|pd| pd.config_dir().join("config.json"))
    }

    /// Where tracing output goes; the TUI owns stdout.
    pub fn trace_log_path() -> PathBuf {
        env::var("DINOTYPE_TRACE_LOG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir().join("dinotype_trace.log"))
    }
}
