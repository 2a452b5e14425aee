//! XDash - Main Entry Point

use xdash::app::application::run_app;
use xdash::domain::config::AppConfig;
use xdash::utils::config_store::{config_path, load_or_init};

fn main() {
    // Config is read before logging exists; problems are reported once it does
    let loaded = config_path().and_then(|path| load_or_init::<AppConfig>(&path));
    let (config, load_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    let _log_guard = xdash::logging::init(&config.logging);

    if let Some(e) = load_error {
        tracing::warn!("Using default configuration: {:#}", e);
    }
    tracing::info!("Starting XDash ({})...", config.server.describe());

    run_app(config);
}
