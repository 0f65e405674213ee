use hive_outbox::broker::BrokerConfig;
use hive_outbox::dispatcher::DispatcherConfig;
use std::time::Duration;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except secrets have defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown drain deadline in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT validation configuration (base64 secret).
    pub jwt: JwtConfig,
    /// Base URL of the identity service.
    pub identity_service_url: String,
    /// This service's id for S2S request signing.
    pub internal_service_id: String,
    /// Shared secret for S2S request signing.
    pub internal_shared_secret: String,
    /// AMQP broker settings; `None` when `BROKER_HOST` is unset, in which
    /// case the outbox dispatcher is not started.
    pub broker: Option<BrokerConfig>,
    /// How long a Pending ticket holds its seats (default: 10 min).
    pub reservation_hold_window: Duration,
    /// Expiry sweep cadence (default: 60 s).
    pub expiry_tick_interval: Duration,
    /// Outbox dispatcher tuning.
    pub outbox: DispatcherConfig,
    /// Seat-map cache TTL (default: 60 s).
    pub seat_map_cache_ttl: Duration,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T
where
    T::Err: std::fmt::Debug,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid value: {e:?}")),
        Err(_) => default,
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var | Default |
    /// |---|---|
    /// | `HOST` | `0.0.0.0` |
    /// | `PORT` | `3000` |
    /// | `CORS_ORIGINS` | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `30` |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30` |
    /// | `JWT_SECRET` | required |
    /// | `IDENTITY_SERVICE_URL` | `http://localhost:7000` |
    /// | `INTERNAL_SERVICE_ID` | `hive-reservations` |
    /// | `INTERNAL_SHARED_SECRET` | empty |
    /// | `BROKER_HOST` | unset (dispatcher disabled) |
    /// | `BROKER_PORT` | `5672` |
    /// | `BROKER_USERNAME` / `BROKER_PASSWORD` | `guest` / `guest` |
    /// | `BROKER_VHOST` | `/` |
    /// | `RESERVATION_HOLD_WINDOW_SECS` | `600` |
    /// | `EXPIRY_TICK_INTERVAL_SECS` | `60` |
    /// | `OUTBOX_BATCH_SIZE` | `50` |
    /// | `OUTBOX_TICK_INTERVAL_SECS` | `10` |
    /// | `OUTBOX_STUCK_TIMEOUT_SECS` | `300` |
    /// | `OUTBOX_MAX_RETRIES` | `5` |
    /// | `SEAT_MAP_CACHE_TTL_SECS` | `60` |
    pub fn from_env() -> Self {
        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let broker = std::env::var("BROKER_HOST").ok().map(|host| BrokerConfig {
            host,
            port: env_or("BROKER_PORT", 5672),
            username: std::env::var("BROKER_USERNAME").unwrap_or_else(|_| "guest".into()),
            password: std::env::var("BROKER_PASSWORD").unwrap_or_else(|_| "guest".into()),
            vhost: std::env::var("BROKER_VHOST").unwrap_or_else(|_| "/".into()),
        });

        let outbox = DispatcherConfig {
            tick_interval: Duration::from_secs(env_or("OUTBOX_TICK_INTERVAL_SECS", 10)),
            batch_size: env_or("OUTBOX_BATCH_SIZE", 50),
            stuck_timeout: Duration::from_secs(env_or("OUTBOX_STUCK_TIMEOUT_SECS", 300)),
            max_retries: env_or("OUTBOX_MAX_RETRIES", 5),
        };

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            identity_service_url: std::env::var("IDENTITY_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:7000".into()),
            internal_service_id: std::env::var("INTERNAL_SERVICE_ID")
                .unwrap_or_else(|_| "hive-reservations".into()),
            internal_shared_secret: std::env::var("INTERNAL_SHARED_SECRET").unwrap_or_default(),
            broker,
            reservation_hold_window: Duration::from_secs(env_or(
                "RESERVATION_HOLD_WINDOW_SECS",
                600,
            )),
            expiry_tick_interval: Duration::from_secs(env_or("EXPIRY_TICK_INTERVAL_SECS", 60)),
            outbox,
            seat_map_cache_ttl: Duration::from_secs(env_or("SEAT_MAP_CACHE_TTL_SECS", 60)),
        }
    }
}
