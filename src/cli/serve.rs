//! Serve command implementation

use crate::api::{create_router, AppContext};
use crate::cli::ServeArgs;
use crate::config::DashboardConfig;
use crate::logging::init_tracing;
use crate::poller::build_pollers;
use reqwest::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &ServeArgs,
) -> Result<DashboardConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        DashboardConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        DashboardConfig::default()
    };

    config = config.with_env_overrides();

    // CLI overrides win
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Shared HTTP client for every source adapter. Per-request timeouts are set
/// by the adapters themselves.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("statusboard/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Main serve command handler
pub async fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    init_tracing(&config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        channels = config.channels.len(),
        "Starting Statusboard"
    );

    let config = Arc::new(config);
    let ctx = Arc::new(AppContext::new(Arc::clone(&config)));
    let client = Arc::new(build_http_client()?);

    let (pollers, errors) = build_pollers(&config, &ctx.store, &ctx.hub, client);
    for error in &errors {
        tracing::error!(error = %error, "Channel skipped");
    }
    if pollers.is_empty() {
        tracing::warn!("No channels to poll; serving an empty dashboard");
    }

    let cancel_token = CancellationToken::new();
    let poller_handles: Vec<_> = pollers
        .into_iter()
        .map(|poller| poller.start(cancel_token.clone()))
        .collect();

    // Wake every session so open sockets close promptly on shutdown.
    let hub = Arc::clone(&ctx.hub);
    let hub_token = cancel_token.clone();
    let hub_closer = tokio::spawn(async move {
        hub_token.cancelled().await;
        hub.close_all();
    });

    let app = create_router(Arc::clone(&ctx));
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Dashboard server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token.clone()))
        .await;

    // The server can also stop on an accept error; pollers must stop either way.
    cancel_token.cancel();
    for handle in poller_handles {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Poller task ended abnormally");
        }
    }
    let _ = hub_closer.await;

    served?;
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGINT or SIGTERM), or for cancellation from
/// elsewhere.
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
        _ = cancel_token.cancelled() => {}
    }

    cancel_token.cancel();
}
