use std::fs::OpenOptions;
use std::path::Path;
use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Installs a file-backed subscriber once. Later calls are no-ops, as is a
/// log file that cannot be opened.
pub fn init_tracing(enabled: bool, path: &Path) {
    if !enabled {
        return;
    }

    let _ = TRACING_INIT.get_or_init(|| {
        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => file,
            Err(_) => return,
        };
        let filter = EnvFilter::try_from_env("DINOTYPE_LOG")
            .unwrap_or_else(|_| EnvFilter::new("dinotype=info"));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
