//! End-to-end tests for the reservation lifecycle over HTTP: reserve,
//! confirm, idempotent webhook retries, and the interplay with expiry.

mod common;

use axum::http::{Method, StatusCode};
use hive_core::layout::{AuditoriumLayout, PricingTier};
use hive_core::seating::Seat;
use hive_db::repositories::{OutboxRepo, ShowtimeRepo, TicketRepo};
use hive_outbox::events::EVENT_EMAIL_NOTIFICATION;
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;

use common::*;

fn vip_layout() -> AuditoriumLayout {
    AuditoriumLayout {
        tiers: vec![PricingTier {
            tier_name: "VIP".to_string(),
            price_surcharge: Decimal::new(500, 2),
            seats: vec![Seat::new(5, 5)],
        }],
        ..Default::default()
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn happy_reserve_prices_and_holds_seats(pool: PgPool) {
    let movie = seed_movie(&pool).await;
    let cinema = seed_approved_cinema(&pool, "org-1").await;
    let auditorium = seed_auditorium(&pool, cinema.id, Some(vip_layout())).await;
    let showtime = seed_showtime(&pool, movie.id, auditorium.id, Decimal::new(1000, 2)).await;

    let token = mint_token("customer-1", "customer-1@example.com", &[]);
    let response = send_json_auth(
        build_test_app(pool.clone()),
        Method::POST,
        "/api/tickets/reserve",
        &token,
        json!({
            "showtime_id": showtime.id,
            "seats": [{"row": 0, "col": 0}, {"row": 5, "col": 5}],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["total_amount"], "25.00");
    let reference = body["booking_reference"].as_str().unwrap();
    assert!(reference.starts_with("HIVE-"));
    assert_eq!(reference.len(), 13);

    let cells = ShowtimeRepo::current_seat_state(&pool, showtime.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cells.len(), 100);
    assert_eq!(cells[0], 1); // (0, 0) reserved
    assert_eq!(cells[55], 1); // (5, 5) reserved
    assert_eq!(cells.iter().filter(|&&c| c != 0).count(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reserving_a_taken_seat_is_a_conflict(pool: PgPool) {
    let movie = seed_movie(&pool).await;
    let cinema = seed_approved_cinema(&pool, "org-1").await;
    let auditorium = seed_auditorium(&pool, cinema.id, None).await;
    let showtime = seed_showtime(&pool, movie.id, auditorium.id, Decimal::new(1000, 2)).await;

    // Pre-set (0, 0) to Sold.
    let mut cells = vec![0u8; 100];
    cells[0] = 2;
    sqlx::query("UPDATE showtimes SET seat_state = $2, version = version + 1 WHERE id = $1")
        .bind(showtime.id)
        .bind(&cells)
        .execute(&pool)
        .await
        .unwrap();

    let token = mint_token("customer-1", "customer-1@example.com", &[]);
    let response = send_json_auth(
        build_test_app(pool.clone()),
        Method::POST,
        "/api/tickets/reserve",
        &token,
        json!({"showtime_id": showtime.id, "seats": [{"row": 0, "col": 0}]}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Seats Unavailable");

    assert_eq!(
        TicketRepo::count_for_showtime(&pool, showtime.id)
            .await
            .unwrap(),
        0
    );
    let after = ShowtimeRepo::current_seat_state(&pool, showtime.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after[0], 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn out_of_bounds_seat_is_a_validation_failure(pool: PgPool) {
    let movie = seed_movie(&pool).await;
    let cinema = seed_approved_cinema(&pool, "org-1").await;
    let auditorium = seed_auditorium(&pool, cinema.id, None).await;
    let showtime = seed_showtime(&pool, movie.id, auditorium.id, Decimal::new(1000, 2)).await;

    let token = mint_token("customer-1", "customer-1@example.com", &[]);
    let response = send_json_auth(
        build_test_app(pool.clone()),
        Method::POST,
        "/api/tickets/reserve",
        &token,
        json!({"showtime_id": showtime.id, "seats": [{"row": 99, "col": 99}]}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let cells = ShowtimeRepo::current_seat_state(&pool, showtime.id)
        .await
        .unwrap()
        .unwrap();
    assert!(cells.iter().all(|&c| c == 0));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_seat_list_is_rejected(pool: PgPool) {
    let movie = seed_movie(&pool).await;
    let cinema = seed_approved_cinema(&pool, "org-1").await;
    let auditorium = seed_auditorium(&pool, cinema.id, None).await;
    let showtime = seed_showtime(&pool, movie.id, auditorium.id, Decimal::new(1000, 2)).await;

    let token = mint_token("customer-1", "customer-1@example.com", &[]);
    let response = send_json_auth(
        build_test_app(pool.clone()),
        Method::POST,
        "/api/tickets/reserve",
        &token,
        json!({"showtime_id": showtime.id, "seats": []}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn disabled_seat_is_a_validation_failure(pool: PgPool) {
    let movie = seed_movie(&pool).await;
    let cinema = seed_approved_cinema(&pool, "org-1").await;
    let layout = AuditoriumLayout {
        disabled_seats: vec![Seat::new(4, 4)],
        ..Default::default()
    };
    let auditorium = seed_auditorium(&pool, cinema.id, Some(layout)).await;
    let showtime = seed_showtime(&pool, movie.id, auditorium.id, Decimal::new(1000, 2)).await;

    let token = mint_token("customer-1", "customer-1@example.com", &[]);
    let response = send_json_auth(
        build_test_app(pool.clone()),
        Method::POST,
        "/api/tickets/reserve",
        &token,
        json!({"showtime_id": showtime.id, "seats": [{"row": 4, "col": 4}]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reserve_requires_authentication(pool: PgPool) {
    let response = send_json(
        build_test_app(pool),
        Method::POST,
        "/api/tickets/reserve",
        json!({"showtime_id": uuid::Uuid::now_v7(), "seats": [{"row": 0, "col": 0}]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_seats_collapse_to_one(pool: PgPool) {
    let movie = seed_movie(&pool).await;
    let cinema = seed_approved_cinema(&pool, "org-1").await;
    let auditorium = seed_auditorium(&pool, cinema.id, None).await;
    let showtime = seed_showtime(&pool, movie.id, auditorium.id, Decimal::new(1000, 2)).await;

    let token = mint_token("customer-1", "customer-1@example.com", &[]);
    let response = send_json_auth(
        build_test_app(pool.clone()),
        Method::POST,
        "/api/tickets/reserve",
        &token,
        json!({
            "showtime_id": showtime.id,
            "seats": [{"row": 2, "col": 2}, {"row": 2, "col": 2}],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    // One seat's worth, not two.
    assert_eq!(body["total_amount"], "10.00");
}

async fn reserve_one_seat(pool: &PgPool, showtime_id: uuid::Uuid) -> String {
    let token = mint_token("customer-1", "customer-1@example.com", &[]);
    let response = send_json_auth(
        build_test_app(pool.clone()),
        Method::POST,
        "/api/tickets/reserve",
        &token,
        json!({"showtime_id": showtime_id, "seats": [{"row": 0, "col": 0}]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["booking_reference"].as_str().unwrap().to_string()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn payment_webhook_confirms_and_stages_email(pool: PgPool) {
    let movie = seed_movie(&pool).await;
    let cinema = seed_approved_cinema(&pool, "org-1").await;
    let auditorium = seed_auditorium(&pool, cinema.id, None).await;
    let showtime = seed_showtime(&pool, movie.id, auditorium.id, Decimal::new(1000, 2)).await;
    let reference = reserve_one_seat(&pool, showtime.id).await;

    // Populate the seat-map cache so the test observes its invalidation.
    let app = build_test_app(pool.clone());
    let warm = send(
        app.clone(),
        Method::GET,
        &format!("/api/showtimes/{}/seatmap", showtime.id),
    )
    .await;
    assert_eq!(warm.status(), StatusCode::OK);

    let response = send_json(
        app.clone(),
        Method::POST,
        "/api/tickets/payment/success",
        json!({
            "booking_reference": reference,
            "transaction_id": "TX-1",
            "status": "succeeded",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "confirmed");
    assert!(body["paid_at"].is_string());

    let cells = ShowtimeRepo::current_seat_state(&pool, showtime.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cells[0], 2); // (0, 0) sold

    let events = OutboxRepo::list_by_event_type(&pool, EVENT_EMAIL_NOTIFICATION)
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].payload["recipient_email"], "customer-1@example.com");

    // The same app instance re-renders the seat map from storage: the
    // cached pre-payment view must be gone.
    let refreshed = send(
        app,
        Method::GET,
        &format!("/api/showtimes/{}/seatmap", showtime.id),
    )
    .await;
    let map = body_json(refreshed).await;
    let sold = map["seats"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["row"] == 0 && s["col"] == 0)
        .unwrap();
    assert_eq!(sold["status"], "sold");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn payment_webhook_is_idempotent(pool: PgPool) {
    let movie = seed_movie(&pool).await;
    let cinema = seed_approved_cinema(&pool, "org-1").await;
    let auditorium = seed_auditorium(&pool, cinema.id, None).await;
    let showtime = seed_showtime(&pool, movie.id, auditorium.id, Decimal::new(1000, 2)).await;
    let reference = reserve_one_seat(&pool, showtime.id).await;

    let webhook = json!({"booking_reference": reference, "transaction_id": "TX-1", "status": "succeeded"});
    let first = send_json(
        build_test_app(pool.clone()),
        Method::POST,
        "/api/tickets/payment/success",
        webhook.clone(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = send_json(
        build_test_app(pool.clone()),
        Method::POST,
        "/api/tickets/payment/success",
        webhook,
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    let body = body_json(second).await;
    assert_eq!(body["status"], "confirmed");

    // No second notification was staged.
    let events = OutboxRepo::list_by_event_type(&pool, EVENT_EMAIL_NOTIFICATION)
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn payment_webhook_for_unknown_reference_is_not_found(pool: PgPool) {
    let response = send_json(
        build_test_app(pool),
        Method::POST,
        "/api/tickets/payment/success",
        json!({"booking_reference": "HIVE-00000000"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn expired_ticket_cannot_be_revived_by_the_webhook(pool: PgPool) {
    let movie = seed_movie(&pool).await;
    let cinema = seed_approved_cinema(&pool, "org-1").await;
    let auditorium = seed_auditorium(&pool, cinema.id, None).await;
    let showtime = seed_showtime(&pool, movie.id, auditorium.id, Decimal::new(1000, 2)).await;
    let reference = reserve_one_seat(&pool, showtime.id).await;

    // Age the hold past the window and run the sweep.
    sqlx::query("UPDATE tickets SET created_at = NOW() - INTERVAL '11 minutes' WHERE booking_reference = $1")
        .bind(&reference)
        .execute(&pool)
        .await
        .unwrap();
    let cache = hive_api::cache::TtlCache::new(std::time::Duration::from_secs(60));
    let stats = hive_api::background::expiry::run_sweep(
        &pool,
        &cache,
        std::time::Duration::from_secs(600),
    )
    .await
    .unwrap();
    assert_eq!(stats.expired, 1);

    let response = send_json(
        build_test_app(pool.clone()),
        Method::POST,
        "/api/tickets/payment/success",
        json!({"booking_reference": reference, "transaction_id": "TX-1", "status": "succeeded"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Invalid State");

    // The released cell stays available and the ticket stays expired.
    let cells = ShowtimeRepo::current_seat_state(&pool, showtime.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cells[0], 0);
    let ticket = TicketRepo::find_by_reference(&pool, &reference)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ticket.status, "expired");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn my_bookings_lists_own_tickets_newest_first(pool: PgPool) {
    let movie = seed_movie(&pool).await;
    let cinema = seed_approved_cinema(&pool, "org-1").await;
    let auditorium = seed_auditorium(&pool, cinema.id, None).await;
    let showtime = seed_showtime(&pool, movie.id, auditorium.id, Decimal::new(1000, 2)).await;
    let reference = reserve_one_seat(&pool, showtime.id).await;

    let token = mint_token("customer-1", "customer-1@example.com", &[]);
    let response = send_auth(
        build_test_app(pool.clone()),
        Method::GET,
        "/api/tickets/my-bookings",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let bookings = body.as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["booking_reference"], reference.as_str());
    assert_eq!(bookings[0]["movie_title"], "The Swarm");
    assert_eq!(bookings[0]["cinema_name"], "Grand Hall");

    // A user with no tickets gets an empty list, not an error.
    let other = mint_token("customer-2", "customer-2@example.com", &[]);
    let response = send_auth(
        build_test_app(pool),
        Method::GET,
        "/api/tickets/my-bookings",
        &other,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);
}
