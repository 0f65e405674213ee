//! Handlers for the `/cinemas` resource.
//!
//! Reads are anonymous. Creation requires the organizer (or admin) role;
//! updates and deletes additionally require ownership of the cinema.
//! Approval status transitions are admin-only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use hive_core::error::CoreError;
use hive_core::types::Id;
use hive_core::{approval, policy};
use hive_db::models::cinema::{Cinema, CreateCinema, UpdateCinema};
use hive_db::repositories::CinemaRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireOrganizer};
use crate::state::AppState;

/// GET /api/cinemas
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Cinema>>> {
    let cinemas = CinemaRepo::list(&state.pool).await?;
    Ok(Json(cinemas))
}

/// GET /api/cinemas/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> AppResult<Json<Cinema>> {
    let cinema = find_cinema(&state, id).await?;
    Ok(Json(cinema))
}

/// POST /api/cinemas
///
/// The authenticated organizer becomes the owner; the cinema starts in
/// `pending` approval.
pub async fn create(
    RequireOrganizer(principal): RequireOrganizer,
    State(state): State<AppState>,
    Json(input): Json<CreateCinema>,
) -> AppResult<(StatusCode, Json<Cinema>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be empty".into(),
        )));
    }
    if !input.contact_email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "contact_email must be an email address".into(),
        )));
    }
    let cinema = CinemaRepo::create(&state.pool, &principal.id, &input).await?;
    tracing::info!(cinema_id = %cinema.id, organizer_id = %principal.id, "Cinema created");
    Ok((StatusCode::CREATED, Json(cinema)))
}

/// PUT /api/cinemas/{id}
pub async fn update(
    RequireOrganizer(principal): RequireOrganizer,
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(input): Json<UpdateCinema>,
) -> AppResult<StatusCode> {
    let cinema = find_cinema(&state, id).await?;
    policy::ensure_owner(&principal, &cinema.organizer_id)?;

    CinemaRepo::update(&state.pool, id, &principal.id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Cinema",
            id: id.to_string(),
        }))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

/// PATCH /api/cinemas/{id}/status?status=...
///
/// Admin-only approval decision. The transition is validated against the
/// current status; re-approving a rejected cinema is not allowed.
pub async fn set_status(
    RequireAdmin(principal): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Query(query): Query<StatusQuery>,
) -> AppResult<StatusCode> {
    let status = query.status.to_lowercase();
    approval::validate_status(&status).map_err(CoreError::Validation)?;

    let cinema = find_cinema(&state, id).await?;
    approval::validate_transition(&cinema.approval_status, &status)
        .map_err(CoreError::Conflict)?;

    CinemaRepo::set_approval_status(&state.pool, id, &status, &principal.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Cinema",
            id: id.to_string(),
        }))?;

    tracing::info!(cinema_id = %id, status = %status, admin_id = %principal.id, "Cinema approval status changed");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/cinemas/{id}
pub async fn delete(
    RequireOrganizer(principal): RequireOrganizer,
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> AppResult<StatusCode> {
    let cinema = find_cinema(&state, id).await?;
    policy::ensure_owner(&principal, &cinema.organizer_id)?;

    CinemaRepo::soft_delete(&state.pool, id, &principal.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn find_cinema(state: &AppState, id: Id) -> AppResult<Cinema> {
    CinemaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Cinema",
            id: id.to_string(),
        }))
}
