//! Tracing setup: JSON on stdout plus one rolling file per model service

use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_DIR: &str = "logs";

/// Targets written to `<dir>/<target>.<date>.log`
pub const SERVICE_TARGETS: [&str; 2] = ["ddx", "ttx"];

/// Rotated files kept per service
const MAX_LOG_FILES: usize = 5;

/// `LOG_DIR`, or `logs` under the working directory
pub fn log_dir() -> PathBuf {
    std::env::var("LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_DIR))
}

/// Pass only events logged under `target`
pub fn service_filter(target: &str) -> Targets {
    Targets::new().with_target(target, Level::INFO)
}

fn service_appender(dir: &Path, target: &str) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(target)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
}

/// Install the global subscriber.
///
/// The returned guards flush the file writers on drop and must be held until
/// the server exits.
pub fn init(dir: &Path) -> Result<Vec<WorkerGuard>, InitError> {
    let mut guards = Vec::with_capacity(SERVICE_TARGETS.len());
    let mut file_layers = Vec::with_capacity(SERVICE_TARGETS.len());

    for target in SERVICE_TARGETS {
        let (writer, guard) = tracing_appender::non_blocking(service_appender(dir, target)?);
        guards.push(guard);
        file_layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(service_filter(target))
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(fmt::layer().json())
        .with(file_layers)
        .init();

    Ok(guards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_filter_keeps_only_its_target() {
        let ddx = service_filter("ddx");
        assert!(ddx.would_enable("ddx", &Level::INFO));
        assert!(ddx.would_enable("ddx", &Level::ERROR));
        assert!(!ddx.would_enable("ddx", &Level::DEBUG));
        assert!(!ddx.would_enable("ttx", &Level::INFO));
        assert!(!ddx.would_enable("audit", &Level::INFO));
    }

    #[test]
    fn test_service_appender_writes_into_log_dir() {
        use std::io::Write;

        let dir = std::env::temp_dir().join(format!("ddx-logs-{}", uuid::Uuid::new_v4()));
        let mut appender = service_appender(&dir, "ttx").unwrap();
        appender.write_all(b"{\"msg\":\"ok\"}\n").unwrap();
        appender.flush().unwrap();

        let names: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("ttx."));
        assert!(names[0].ends_with(".log"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
