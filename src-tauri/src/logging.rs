use std::{fs, io, path::Path};

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt::time::ChronoLocal, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::DESKTOP_LOG_PREFIX;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Installs the global subscriber: a daily rotated file under `log_dir` plus
/// stderr. `RUST_LOG` wins over the `debug` switch.
///
/// The returned guard flushes the file writer and must live as long as the app.
pub(crate) fn init_logging(log_dir: &Path, debug: bool) -> Result<WorkerGuard, String> {
    fs::create_dir_all(log_dir).map_err(|error| {
        format!(
            "Failed to create log directory {}: {}",
            log_dir.display(),
            error
        )
    })?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(rolling::daily(log_dir, DESKTOP_LOG_PREFIX));
    let default_level = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
                .with_ansi(false)
                .with_target(true),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
                .with_target(false),
        )
        .try_init()
        .map_err(|error| format!("Failed to install log subscriber: {error}"))?;

    Ok(guard)
}

pub(crate) fn append_desktop_log(message: &str) {
    tracing::info!(target: "idkr::desktop", "{message}");
}

pub(crate) fn append_startup_log(message: &str) {
    tracing::info!(target: "idkr::startup", "{message}");
}

pub(crate) fn append_update_log(message: &str) {
    tracing::info!(target: "idkr::update", "{message}");
}

pub(crate) fn append_swap_log(message: &str) {
    tracing::info!(target: "idkr::swap", "{message}");
}

/// Swap failures: unreadable swap roots and redirects that resolve to nothing.
pub(crate) fn append_swap_error_log(message: &str) {
    tracing::warn!(target: "idkr::swap", "{message}");
}

pub(crate) fn append_error_log(message: &str) {
    tracing::error!(target: "idkr::desktop", "{message}");
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn init_logging_creates_log_directory() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let log_dir = temp.path().join("logs");

        // A second subscriber in the same test binary is rejected, which is
        // fine here: only the directory side effect is under test.
        let _ = init_logging(&log_dir, false);

        assert!(log_dir.is_dir());
    }

    #[derive(Clone, Default)]
    struct CapturedLines(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLines {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("capture lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn swap_failures_are_logged_above_info() {
        let captured = CapturedLines::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            append_swap_log("rules installed");
            append_swap_error_log("resource swapper disabled");
        });

        let output = String::from_utf8(captured.0.lock().expect("capture lock").clone())
            .expect("utf8 log output");
        assert!(output.contains("WARN"));
        assert!(output.contains("resource swapper disabled"));
        assert!(!output.contains("rules installed"));
    }
}
