//! dispute-desk server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use dispute_desk_api::{AppState, auth_middleware, health, router as api_router};
use dispute_desk_common::{Config, config::LogFormat};
use dispute_desk_core::{DisputeService, ProcessorRegistry, StaffService, SyncService};
use dispute_desk_db::repositories::{DisputeRepository, RebuttalRepository, StaffUserRepository};
use dispute_desk_db::entities::dispute::Processor;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "dispute_desk=debug,tower_http=debug";

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured filter.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        config
            .logging
            .filter
            .as_deref()
            .unwrap_or(DEFAULT_LOG_FILTER)
            .into()
    });

    let (pretty, json) = match config.logging.format {
        LogFormat::Pretty => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;
    init_tracing(&config);

    info!("Starting dispute-desk server...");

    // Connect to database
    let db = Arc::new(dispute_desk_db::init(&config.database).await?);
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    dispute_desk_db::migrate(&db).await?;
    info!("Migrations completed");

    // Processor adapters
    let processors = ProcessorRegistry::from_config(&config.processors)?;
    for processor in [Processor::Stripe, Processor::PayPal] {
        if processors.get(processor).is_some() {
            info!(%processor, "Processor configured");
        } else {
            info!(%processor, "Processor not configured");
        }
    }

    // Initialize repositories
    let dispute_repo = DisputeRepository::new(Arc::clone(&db));
    let rebuttal_repo = RebuttalRepository::new(Arc::clone(&db));
    let staff_user_repo = StaffUserRepository::new(Arc::clone(&db));

    // Initialize services
    let state = AppState {
        dispute_service: DisputeService::new(
            dispute_repo.clone(),
            rebuttal_repo,
            staff_user_repo.clone(),
            processors.clone(),
        ),
        sync_service: SyncService::new(dispute_repo, processors),
        staff_service: StaffService::new(staff_user_repo),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
