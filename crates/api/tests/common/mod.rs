// All functions in this module are shared test helpers. Not every test
// binary uses every helper, so dead_code warnings are suppressed here.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tower::ServiceExt;

use hive_api::auth::jwt::{sign_token, Claims, JwtConfig};
use hive_api::cache::TtlCache;
use hive_api::config::ServerConfig;
use hive_api::router::build_app_router;
use hive_api::state::AppState;
use hive_core::approval::APPROVAL_APPROVED;
use hive_core::layout::AuditoriumLayout;
use hive_core::types::Id;
use hive_db::models::auditorium::{Auditorium, CreateAuditorium};
use hive_db::models::cinema::{Cinema, CreateCinema};
use hive_db::models::movie::{CreateMovie, Movie};
use hive_db::models::showtime::{CreateShowtime, Showtime};
use hive_db::repositories::{AuditoriumRepo, CinemaRepo, MovieRepo, ShowtimeRepo};

/// Base64 of "hive-integration-test-secret".
pub const TEST_JWT_SECRET: &str = "aGl2ZS1pbnRlZ3JhdGlvbi10ZXN0LXNlY3JldA==";

/// Build a test `ServerConfig` with safe defaults and no broker.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        identity_service_url: "http://localhost:7000".to_string(),
        internal_service_id: "hive-reservations".to_string(),
        internal_shared_secret: "test-shared-secret".to_string(),
        broker: None,
        reservation_hold_window: Duration::from_secs(600),
        expiry_tick_interval: Duration::from_secs(60),
        outbox: Default::default(),
        seat_map_cache_ttl: Duration::from_secs(60),
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool, so integration tests exercise the same stack as
/// production.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        seat_maps: Arc::new(TtlCache::new(config.seat_map_cache_ttl)),
    };
    build_app_router(state, &config)
}

/// Sign an access token for a test principal.
pub fn mint_token(user_id: &str, email: &str, roles: &[&str]) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: now + 3600,
        iat: now,
    };
    sign_token(
        &claims,
        &JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
    )
    .expect("token signing failed")
}

// ---------------------------------------------------------------------------
// Shared HTTP test helpers
// ---------------------------------------------------------------------------

/// Collect the response body into a `serde_json::Value`.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send an anonymous JSON request.
pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send an authenticated JSON request.
pub async fn send_json_auth(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send an authenticated bodyless request.
pub async fn send_auth(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
) -> axum::response::Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send an anonymous bodyless request.
pub async fn send(app: Router, method: Method, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

pub async fn seed_movie(pool: &PgPool) -> Movie {
    MovieRepo::create(
        pool,
        "seed",
        &CreateMovie {
            title: "The Swarm".to_string(),
            description: "A hive goes rogue".to_string(),
            duration_minutes: 120,
            release_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            poster_url: None,
        },
    )
    .await
    .expect("seed movie")
}

/// Create a cinema for `organizer_id` and approve it.
pub async fn seed_approved_cinema(pool: &PgPool, organizer_id: &str) -> Cinema {
    let cinema = CinemaRepo::create(
        pool,
        organizer_id,
        &CreateCinema {
            name: "Grand Hall".to_string(),
            location: "Main Street 1".to_string(),
            contact_email: "box-office@example.com".to_string(),
        },
    )
    .await
    .expect("seed cinema");
    CinemaRepo::set_approval_status(pool, cinema.id, APPROVAL_APPROVED, "seed-admin")
        .await
        .expect("approve cinema")
        .expect("cinema exists")
}

/// Create a 10x10 auditorium with the given layout.
pub async fn seed_auditorium(
    pool: &PgPool,
    cinema_id: Id,
    layout: Option<AuditoriumLayout>,
) -> Auditorium {
    AuditoriumRepo::create(
        pool,
        "seed",
        &CreateAuditorium {
            cinema_id,
            name: "Screen 1".to_string(),
            max_rows: 10,
            max_columns: 10,
            layout,
        },
    )
    .await
    .expect("seed auditorium")
}

/// Create a showtime with the given base price on a 10x10 auditorium.
pub async fn seed_showtime(pool: &PgPool, movie_id: Id, auditorium_id: Id, base_price: Decimal) -> Showtime {
    ShowtimeRepo::create(
        pool,
        "seed",
        &CreateShowtime {
            movie_id,
            auditorium_id,
            start_time: Utc::now() + chrono::Duration::days(1),
            base_price,
        },
        10,
        10,
    )
    .await
    .expect("seed showtime")
}
