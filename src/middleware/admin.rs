use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, services::admin_token::AdminTokenService, AppState};

pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// Extractor that validates the `X-Admin-Token` header against the registered admin tokens.
///
/// Put it first in a handler's argument list: a missing header is rejected before any
/// storage access and before the body is read.
pub struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ADMIN_TOKEN_HEADER)
            .filter(|v| !v.is_empty())
            .ok_or(AppError::Unauthorized("Missing admin token"))?;

        let token = header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid admin token"))?;

        if !AdminTokenService::exists(&state.db, token).await? {
            return Err(AppError::Unauthorized("Invalid admin token"));
        }

        Ok(AdminAuth)
    }
}
