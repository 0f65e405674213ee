//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps the authenticated principal and rejects requests
//! whose role set does not meet the minimum requirement. Resource-level
//! ownership checks stay in the handlers (they need the loaded cinema);
//! these extractors only gate by role.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use hive_core::error::CoreError;
use hive_core::policy::Principal;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(principal): RequireAdmin) -> AppResult<Json<()>> {
///     // principal is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub Principal);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;
        if !principal.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(principal))
    }
}

/// Requires `organizer` or `admin` role. Rejects with 403 Forbidden
/// otherwise.
pub struct RequireOrganizer(pub Principal);

impl FromRequestParts<AppState> for RequireOrganizer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;
        if !principal.is_admin() && !principal.is_organizer() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Organizer or Admin role required".into(),
            )));
        }
        Ok(RequireOrganizer(principal))
    }
}
