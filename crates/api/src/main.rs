use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hive_api::background;
use hive_api::cache::TtlCache;
use hive_api::config::ServerConfig;
use hive_api::router::build_app_router;
use hive_api::state::AppState;
use hive_outbox::broker::AmqpPublisher;
use hive_outbox::dispatcher;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hive_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = hive_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    hive_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    hive_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Shared state ---
    let seat_maps = Arc::new(TtlCache::new(config.seat_map_cache_ttl));
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        seat_maps: Arc::clone(&seat_maps),
    };

    // --- Background workers (started only after migrations) ---
    let cancel = CancellationToken::new();
    let mut workers = Vec::new();

    workers.push(tokio::spawn(background::expiry::run(
        pool.clone(),
        Arc::clone(&seat_maps),
        config.reservation_hold_window,
        config.expiry_tick_interval,
        cancel.child_token(),
    )));

    match &config.broker {
        Some(broker_config) => {
            // Fail fast on a misconfigured broker rather than silently
            // dropping notifications.
            let publisher = AmqpPublisher::connect(broker_config)
                .await
                .expect("Failed to connect to AMQP broker");
            workers.push(tokio::spawn(dispatcher::run(
                pool.clone(),
                Arc::new(publisher),
                config.outbox.clone(),
                cancel.child_token(),
            )));
        }
        None => {
            tracing::warn!("BROKER_HOST not set; outbox dispatcher disabled");
        }
    }

    // --- HTTP server ---
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST"),
        config.port,
    );
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    let shutdown_cancel = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received; draining");
            shutdown_cancel.cancel();
        })
        .await
        .expect("Server error");

    // Workers finish their current tick, bounded by the drain deadline.
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    for worker in workers {
        if tokio::time::timeout(drain, worker).await.is_err() {
            tracing::warn!("Background worker did not stop within the drain deadline");
        }
    }
    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}
