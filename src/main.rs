//! Countdown Server - A state-managed HTTP server driving a countdown timer
//!
//! This is the main entry point for the countdown-server application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use countdown_server::{
    api::create_router,
    config::Config,
    services::DesktopNotifier,
    state::AppState,
    tasks::expiry_notifier_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_server={},tower_http=info", config.log_level()))
        .init();

    let settings = config.countdown_settings()?;

    info!("Starting countdown-server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, countdown={}:{:02}, tick={}ms",
          config.host, config.port, settings.minutes(), settings.seconds(), config.tick_ms);

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        settings,
        config.tick_interval(),
    ));

    // Desktop notifications are optional; the countdown works without them
    if config.no_notify {
        info!("Desktop notifications disabled");
    } else {
        let notifier = DesktopNotifier::default();
        match notifier.check_available().await {
            Ok(()) => {
                let notifier_state = Arc::clone(&state);
                tokio::spawn(async move {
                    expiry_notifier_task(notifier_state, notifier).await;
                });
            }
            Err(e) => warn!("{}", e),
        }
    }

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start    - Start or resume the countdown");
    info!("  POST /pause    - Pause the countdown");
    info!("  POST /toggle   - Start or pause the countdown");
    info!("  POST /reset    - Restore the configured duration");
    info!("  POST /settings - Configure minutes and seconds");
    info!("  GET  /status   - Current countdown and server status");
    info!("  GET  /events   - Server-sent countdown updates");
    info!("  GET  /health   - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
