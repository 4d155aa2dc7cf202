//! skilling web app
//!
//! - Public index, debug and account routes
//! - Admin-gated `/manage-graph`
//! - Settings reloaded from the config file on SIGHUP

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use skilling_core::error::{Result, SkillingError};
use skilling_web::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "skilling-web failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path =
        std::env::var("SKILLING_CONFIG").unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.into());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.server.listen_addr()?;

    let settings = Arc::new(config::SettingsStore::new());
    settings.reload(config::settings_pairs(&cfg, std::env::vars())?);

    let state = app_state::AppState::new(cfg, Arc::clone(&settings))?;
    tokio::spawn(reload_on_hangup(path, settings));

    let app = router::build_router(state);

    tracing::info!(%listen, "skilling-web starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| SkillingError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| SkillingError::Internal(format!("server failed: {e}")))
}

/// Re-read the `settings` tree (and env overrides) on SIGHUP. Server and auth
/// sections are fixed for the process lifetime.
#[cfg(unix)]
async fn reload_on_hangup(path: String, settings: Arc<config::SettingsStore>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "SIGHUP handler unavailable; settings reload disabled");
            return;
        }
    };

    while hup.recv().await.is_some() {
        let pairs = config::load_from_file(&path)
            .and_then(|cfg| config::settings_pairs(&cfg, std::env::vars()));
        match pairs {
            Ok(pairs) => {
                let keys = pairs.len();
                settings.reload(pairs);
                tracing::info!(%path, keys, "settings reloaded");
            }
            Err(e) => tracing::warn!(error = %e, %path, "settings reload failed; keeping previous values"),
        }
    }
}

#[cfg(not(unix))]
async fn reload_on_hangup(_path: String, _settings: Arc<config::SettingsStore>) {}
