//! Handlers for the `/movies` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hive_core::error::CoreError;
use hive_core::types::Id;
use hive_db::models::movie::{CreateMovie, Movie, UpdateMovie};
use hive_db::repositories::MovieRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireOrganizer;
use crate::state::AppState;

/// GET /api/movies
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Movie>>> {
    let movies = MovieRepo::list(&state.pool).await?;
    Ok(Json(movies))
}

/// GET /api/movies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> AppResult<Json<Movie>> {
    let movie = MovieRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: id.to_string(),
        }))?;
    Ok(Json(movie))
}

/// POST /api/movies
pub async fn create(
    RequireOrganizer(principal): RequireOrganizer,
    State(state): State<AppState>,
    Json(input): Json<CreateMovie>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "title must not be empty".into(),
        )));
    }
    if input.duration_minutes <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "duration_minutes must be positive".into(),
        )));
    }
    let movie = MovieRepo::create(&state.pool, &principal.id, &input).await?;
    tracing::info!(movie_id = %movie.id, user_id = %principal.id, "Movie created");
    Ok((StatusCode::CREATED, Json(movie)))
}

/// PUT /api/movies/{id}
pub async fn update(
    RequireOrganizer(principal): RequireOrganizer,
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(input): Json<UpdateMovie>,
) -> AppResult<StatusCode> {
    if matches!(input.duration_minutes, Some(d) if d <= 0) {
        return Err(AppError::Core(CoreError::Validation(
            "duration_minutes must be positive".into(),
        )));
    }
    MovieRepo::update(&state.pool, id, &principal.id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: id.to_string(),
        }))?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/movies/{id}
pub async fn delete(
    RequireOrganizer(principal): RequireOrganizer,
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> AppResult<StatusCode> {
    let deleted = MovieRepo::soft_delete(&state.pool, id, &principal.id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: id.to_string(),
        }))
    }
}
