use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::admin::AdminAuth,
    models::announcement::{Announcement, CreateAnnouncementRequest, ListQuery},
    services::announcements::AnnouncementService,
    AppState,
};

/// POST /admin/announcements: the body is decoded as JSON whatever the Content-Type says.
pub async fn create_announcement(
    State(state): State<AppState>,
    _auth: AdminAuth,
    body: Bytes,
) -> AppResult<(StatusCode, Json<Announcement>)> {
    let req: CreateAnnouncementRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::validation(format!("Invalid JSON body: {e}")))?;

    let announcement = AnnouncementService::create(&state.db, &req.title, &req.content).await?;
    tracing::info!(id = announcement.id, "announcement created");

    Ok((StatusCode::CREATED, Json(announcement)))
}

/// GET /admin/announcements?limit=N
pub async fn list_admin_announcements(
    State(state): State<AppState>,
    _auth: AdminAuth,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Announcement>>> {
    list(&state, query).await
}

/// GET /user/announcements?limit=N (public)
pub async fn list_public_announcements(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Announcement>>> {
    list(&state, query).await
}

/// An unparseable query string is treated like an absent one.
async fn list(
    state: &AppState,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Announcement>>> {
    let params = query.map(|Query(q)| q).unwrap_or_default();
    let announcements = AnnouncementService::list(&state.db, params.limit()).await?;
    Ok(Json(announcements))
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
