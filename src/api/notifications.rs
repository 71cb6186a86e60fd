//! Notification API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::{ApiResponse, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateNotificationRequest, Notification, NotificationFeed};
use crate::AppState;

/// Rows touched by a bulk write.
#[derive(Debug, Serialize)]
pub struct Affected {
    pub affected: u64,
}

/// GET /api/notifications/:userId - The user's notifications, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<NotificationFeed>, AppError> {
    let feed = state.repo.list_for_user(&user_id).await?;
    Ok(Json(feed))
}

/// POST /api/notifications - Create a notification for a user.
pub async fn create_notification(
    State(state): State<AppState>,
    Json(request): Json<CreateNotificationRequest>,
) -> ApiResult<Notification> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::Validation("userId is required".to_string()));
    }
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    let notification = state.repo.create(&request).await?;
    tracing::info!(
        "Created {} notification {} for {}",
        notification.kind.as_str(),
        notification.id,
        request.user_id
    );
    Ok(ApiResponse::created(notification))
}

/// PUT /api/notifications/:id/read - Mark one notification as read.
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Affected> {
    state.repo.mark_read(&id).await?;
    Ok(ApiResponse::ok(Affected { affected: 1 }))
}

/// PUT /api/notifications/:userId/mark-all-read - Mark all of a user's notifications as read.
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Affected> {
    let affected = state.repo.mark_all_read(&user_id).await?;
    Ok(ApiResponse::ok(Affected { affected }))
}

/// DELETE /api/notifications/:id - Delete one notification.
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Affected> {
    state.repo.delete(&id).await?;
    Ok(ApiResponse::ok(Affected { affected: 1 }))
}

/// DELETE /api/notifications/:userId/clear-all - Delete all of a user's notifications.
pub async fn clear_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Affected> {
    let affected = state.repo.clear_all(&user_id).await?;
    Ok(ApiResponse::ok(Affected { affected }))
}
