//! Integration tests for soft-delete behaviour across entity types.
//!
//! Deletion is logical: `deleted_at` is set, default reads exclude the
//! row, and repeated deletes are no-ops.

mod common;

use hive_db::repositories::{AuditoriumRepo, CinemaRepo, MovieRepo, ShowtimeRepo};
use sqlx::PgPool;

use common::*;

#[sqlx::test(migrations = "./migrations")]
async fn soft_deleted_movie_is_hidden_from_reads(pool: PgPool) {
    let movie = seed_movie(&pool).await;

    assert!(MovieRepo::soft_delete(&pool, movie.id, "org-1").await.unwrap());
    assert!(MovieRepo::find_by_id(&pool, movie.id).await.unwrap().is_none());
    assert!(MovieRepo::list(&pool).await.unwrap().is_empty());

    // Second delete is a no-op.
    assert!(!MovieRepo::soft_delete(&pool, movie.id, "org-1").await.unwrap());

    // The row itself still exists for audit reads.
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM movies WHERE id = $1")
        .bind(movie.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn soft_deleted_cinema_hides_joined_reads(pool: PgPool) {
    let movie = seed_movie(&pool).await;
    let cinema = seed_approved_cinema(&pool, "org-1").await;
    let auditorium = seed_auditorium(&pool, cinema.id).await;
    let showtime = seed_showtime(&pool, movie.id, auditorium.id).await;

    assert!(CinemaRepo::soft_delete(&pool, cinema.id, "org-1").await.unwrap());

    // The joined loads refuse to resurrect the deleted parent.
    assert!(AuditoriumRepo::find_with_cinema(&pool, auditorium.id)
        .await
        .unwrap()
        .is_none());
    assert!(ShowtimeRepo::find_with_auditorium(&pool, showtime.id)
        .await
        .unwrap()
        .is_none());
    assert!(ShowtimeRepo::seat_map_source(&pool, showtime.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn soft_deleted_showtime_is_hidden(pool: PgPool) {
    let showtime = seed_screening(&pool).await;

    assert!(ShowtimeRepo::soft_delete(&pool, showtime.id, "org-1").await.unwrap());
    assert!(ShowtimeRepo::find_by_id(&pool, showtime.id).await.unwrap().is_none());
    assert!(ShowtimeRepo::find_with_auditorium(&pool, showtime.id)
        .await
        .unwrap()
        .is_none());
}
