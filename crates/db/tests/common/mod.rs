// Shared seed helpers for repository integration tests. Not every test
// binary uses every helper.
#![allow(dead_code)]

use chrono::Utc;
use hive_core::approval::APPROVAL_APPROVED;
use hive_core::types::Id;
use hive_db::models::auditorium::{Auditorium, CreateAuditorium};
use hive_db::models::cinema::{Cinema, CreateCinema};
use hive_db::models::movie::{CreateMovie, Movie};
use hive_db::models::showtime::{CreateShowtime, Showtime};
use hive_db::repositories::{AuditoriumRepo, CinemaRepo, MovieRepo, ShowtimeRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

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

pub async fn seed_auditorium(pool: &PgPool, cinema_id: Id) -> Auditorium {
    AuditoriumRepo::create(
        pool,
        "seed",
        &CreateAuditorium {
            cinema_id,
            name: "Screen 1".to_string(),
            max_rows: 10,
            max_columns: 10,
            layout: None,
        },
    )
    .await
    .expect("seed auditorium")
}

pub async fn seed_showtime(pool: &PgPool, movie_id: Id, auditorium_id: Id) -> Showtime {
    ShowtimeRepo::create(
        pool,
        "seed",
        &CreateShowtime {
            movie_id,
            auditorium_id,
            start_time: Utc::now() + chrono::Duration::days(1),
            base_price: Decimal::new(1000, 2),
        },
        10,
        10,
    )
    .await
    .expect("seed showtime")
}

/// Seed the whole chain and return the showtime.
pub async fn seed_screening(pool: &PgPool) -> Showtime {
    let movie = seed_movie(pool).await;
    let cinema = seed_approved_cinema(pool, "org-1").await;
    let auditorium = seed_auditorium(pool, cinema.id).await;
    seed_showtime(pool, movie.id, auditorium.id).await
}
