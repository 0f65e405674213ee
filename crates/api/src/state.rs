use std::sync::Arc;

use hive_core::types::Id;

use crate::cache::TtlCache;
use crate::config::ServerConfig;
use crate::handlers::showtime::SeatMapView;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: hive_db::DbPool,
    /// Server configuration (accessed by extractors and handlers).
    pub config: Arc<ServerConfig>,
    /// Rendered seat maps keyed per showtime; invalidated by every
    /// reservation, confirmation, and expiry write.
    pub seat_maps: Arc<TtlCache<Id, SeatMapView>>,
}
