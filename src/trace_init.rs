use std::fs;
use std::path::Path;
use std::sync::Once;

use tracing_appender::non_blocking::WorkerGuard;

pub const LOG_FILE: &str = "vocabr.log";
const DEFAULT_FILTER: &str = "vocabr=info";

static INIT: Once = Once::new();

/// Send `tracing` output to `<log_dir>/vocabr.log`. The terminal belongs to
/// the UI, so nothing is ever written to stdout or stderr.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
/// Returns None on every call after the first, or when the log directory
/// cannot be created.
pub fn init_tracing(log_dir: &Path) -> Option<WorkerGuard> {
    let mut guard = None;
    INIT.call_once(|| {
        if fs::create_dir_all(log_dir).is_err() {
            return;
        }
        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (non_blocking, worker) = tracing_appender::non_blocking(file_appender);

        let installed = tracing_subscriber::fmt()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER)),
            )
            .try_init()
            .is_ok();
        if installed {
            guard = Some(worker);
        }
    });
    guard
}
