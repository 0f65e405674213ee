//! Handlers for the `/auditoriums` resource.
//!
//! The layout document is validated here, at write time, so the
//! reservation hot path can trust bounds and tier uniqueness.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hive_core::error::CoreError;
use hive_core::policy;
use hive_core::types::Id;
use hive_db::models::auditorium::{Auditorium, CreateAuditorium, UpdateAuditorium};
use hive_db::repositories::{AuditoriumRepo, CinemaRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireOrganizer;
use crate::state::AppState;

/// GET /api/auditoriums
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Auditorium>>> {
    let auditoriums = AuditoriumRepo::list(&state.pool).await?;
    Ok(Json(auditoriums))
}

/// GET /api/auditoriums/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> AppResult<Json<Auditorium>> {
    let auditorium = AuditoriumRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Auditorium",
            id: id.to_string(),
        }))?;
    Ok(Json(auditorium))
}

/// GET /api/auditoriums/cinema/{cinema_id}
pub async fn list_by_cinema(
    State(state): State<AppState>,
    Path(cinema_id): Path<Id>,
) -> AppResult<Json<Vec<Auditorium>>> {
    CinemaRepo::find_by_id(&state.pool, cinema_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Cinema",
            id: cinema_id.to_string(),
        }))?;
    let auditoriums = AuditoriumRepo::list_by_cinema(&state.pool, cinema_id).await?;
    Ok(Json(auditoriums))
}

/// POST /api/auditoriums
pub async fn create(
    RequireOrganizer(principal): RequireOrganizer,
    State(state): State<AppState>,
    Json(input): Json<CreateAuditorium>,
) -> AppResult<(StatusCode, Json<Auditorium>)> {
    let cinema = CinemaRepo::find_by_id(&state.pool, input.cinema_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Cinema",
            id: input.cinema_id.to_string(),
        }))?;
    policy::ensure_owner(&principal, &cinema.organizer_id)?;

    if input.max_rows <= 0 || input.max_columns <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "max_rows and max_columns must be positive".into(),
        )));
    }
    if let Some(layout) = &input.layout {
        layout.validate(input.max_rows, input.max_columns)?;
    }

    let auditorium = AuditoriumRepo::create(&state.pool, &principal.id, &input).await?;
    tracing::info!(
        auditorium_id = %auditorium.id,
        cinema_id = %cinema.id,
        user_id = %principal.id,
        "Auditorium created"
    );
    Ok((StatusCode::CREATED, Json(auditorium)))
}

/// PUT /api/auditoriums/{id}
///
/// Dimensions are immutable; a layout update is re-validated against the
/// stored dimensions.
pub async fn update(
    RequireOrganizer(principal): RequireOrganizer,
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(input): Json<UpdateAuditorium>,
) -> AppResult<StatusCode> {
    let existing = AuditoriumRepo::find_with_cinema(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Auditorium",
            id: id.to_string(),
        }))?;
    policy::ensure_owner(&principal, &existing.organizer_id)?;

    if let Some(layout) = &input.layout {
        layout.validate(existing.max_rows, existing.max_columns)?;
    }

    AuditoriumRepo::update(&state.pool, id, &principal.id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Auditorium",
            id: id.to_string(),
        }))?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/auditoriums/{id}
pub async fn delete(
    RequireOrganizer(principal): RequireOrganizer,
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> AppResult<StatusCode> {
    let existing = AuditoriumRepo::find_with_cinema(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Auditorium",
            id: id.to_string(),
        }))?;
    policy::ensure_owner(&principal, &existing.organizer_id)?;

    AuditoriumRepo::soft_delete(&state.pool, id, &principal.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
