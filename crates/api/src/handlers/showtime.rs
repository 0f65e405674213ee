//! Handlers for the `/showtimes` resource, including the cached seat map.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hive_core::error::CoreError;
use hive_core::seating::{SeatGrid, SeatStatus};
use hive_core::types::{Id, Timestamp};
use hive_core::policy;
use hive_db::models::showtime::{CreateShowtime, SeatMapSource, Showtime, UpdateShowtime};
use hive_db::repositories::{AuditoriumRepo, MovieRepo, ShowtimeRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireOrganizer;
use crate::state::AppState;

/// One cell of a rendered seat map.
#[derive(Debug, Clone, Serialize)]
pub struct SeatView {
    pub row: i32,
    pub col: i32,
    pub status: SeatStatus,
}

/// Denormalized seat map of a showtime, cached per showtime id with a
/// short TTL. Never consulted by the reservation path.
#[derive(Debug, Clone, Serialize)]
pub struct SeatMapView {
    pub showtime_id: Id,
    pub movie_title: String,
    pub cinema_name: String,
    pub auditorium_name: String,
    pub start_time: Timestamp,
    pub max_rows: i32,
    pub max_columns: i32,
    pub seats: Vec<SeatView>,
}

/// GET /api/showtimes/{id}/seatmap
pub async fn seat_map(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> AppResult<Json<SeatMapView>> {
    if let Some(view) = state.seat_maps.get(&id) {
        return Ok(Json(view));
    }

    let source = ShowtimeRepo::seat_map_source(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Showtime",
            id: id.to_string(),
        }))?;
    let view = render_seat_map(source)?;

    state.seat_maps.insert(id, view.clone());
    Ok(Json(view))
}

/// Decode every cell in row-major order. Corrupt bytes surface as 500s.
fn render_seat_map(source: SeatMapSource) -> Result<SeatMapView, CoreError> {
    let mut cells = source.seat_state;
    let grid = SeatGrid::new(&mut cells, source.max_rows, source.max_columns)?;

    let mut seats = Vec::with_capacity(source.max_rows as usize * source.max_columns as usize);
    for row in 0..source.max_rows {
        for col in 0..source.max_columns {
            let seat = hive_core::seating::Seat::new(row, col);
            seats.push(SeatView {
                row,
                col,
                status: grid.status(seat)?,
            });
        }
    }

    Ok(SeatMapView {
        showtime_id: source.id,
        movie_title: source.movie_title,
        cinema_name: source.cinema_name,
        auditorium_name: source.auditorium_name,
        start_time: source.start_time,
        max_rows: source.max_rows,
        max_columns: source.max_columns,
        seats,
    })
}

/// POST /api/showtimes
///
/// Requires ownership of the auditorium's cinema and an approved cinema.
pub async fn create(
    RequireOrganizer(principal): RequireOrganizer,
    State(state): State<AppState>,
    Json(input): Json<CreateShowtime>,
) -> AppResult<(StatusCode, Json<Showtime>)> {
    let auditorium = AuditoriumRepo::find_with_cinema(&state.pool, input.auditorium_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Auditorium",
            id: input.auditorium_id.to_string(),
        }))?;
    policy::ensure_owner(&principal, &auditorium.organizer_id)?;
    policy::ensure_cinema_approved(&auditorium.approval_status)?;

    MovieRepo::find_by_id(&state.pool, input.movie_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: input.movie_id.to_string(),
        }))?;

    if input.base_price < rust_decimal::Decimal::ZERO {
        return Err(AppError::Core(CoreError::Validation(
            "base_price must not be negative".into(),
        )));
    }

    let showtime = ShowtimeRepo::create(
        &state.pool,
        &principal.id,
        &input,
        auditorium.max_rows,
        auditorium.max_columns,
    )
    .await?;
    tracing::info!(
        showtime_id = %showtime.id,
        auditorium_id = %auditorium.id,
        user_id = %principal.id,
        "Showtime created"
    );
    Ok((StatusCode::CREATED, Json(showtime)))
}

/// PUT /api/showtimes/{id}
///
/// Requires ownership, but deliberately not approval, so an organizer can
/// still amend or cancel screenings after a revocation.
pub async fn update(
    RequireOrganizer(principal): RequireOrganizer,
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(input): Json<UpdateShowtime>,
) -> AppResult<StatusCode> {
    let existing = load_owned_showtime(&state, id, &principal).await?;

    if let Some(movie_id) = input.movie_id {
        MovieRepo::find_by_id(&state.pool, movie_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Movie",
                id: movie_id.to_string(),
            }))?;
    }
    if matches!(input.base_price, Some(p) if p < rust_decimal::Decimal::ZERO) {
        return Err(AppError::Core(CoreError::Validation(
            "base_price must not be negative".into(),
        )));
    }

    ShowtimeRepo::update(&state.pool, existing.id, &principal.id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Showtime",
            id: id.to_string(),
        }))?;
    state.seat_maps.invalidate(&id);
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/showtimes/{id}
pub async fn delete(
    RequireOrganizer(principal): RequireOrganizer,
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> AppResult<StatusCode> {
    let existing = load_owned_showtime(&state, id, &principal).await?;

    ShowtimeRepo::soft_delete(&state.pool, existing.id, &principal.id).await?;
    state.seat_maps.invalidate(&id);
    Ok(StatusCode::NO_CONTENT)
}

async fn load_owned_showtime(
    state: &AppState,
    id: Id,
    principal: &hive_core::policy::Principal,
) -> AppResult<hive_db::models::showtime::ShowtimeWithAuditorium> {
    let showtime = ShowtimeRepo::find_with_auditorium(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Showtime",
            id: id.to_string(),
        }))?;
    policy::ensure_owner(principal, &showtime.organizer_id)?;
    Ok(showtime)
}
