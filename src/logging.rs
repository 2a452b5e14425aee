//! Logging - tracing subscriber setup
//!
//! Console output always; a daily-rolling file in the data directory when
//! enabled. `RUST_LOG` overrides the configured level.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::domain::config::LoggingConfig;
use crate::utils::config_store::app_data_dir;

/// Build the filter: `RUST_LOG` if set, otherwise the configured level
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let console = tracing_subscriber::fmt::layer().with_target(false);

    let (file_layer, guard) = if config.file {
        match app_data_dir() {
            Ok(dir) => {
                let appender = tracing_appender::rolling::daily(dir.join("logs"), "xdash.log");
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("File logging disabled: {e:#}");
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(console)
        .with(file_layer)
        .init();

    guard
}
