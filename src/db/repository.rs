//! Notification persistence for the notification service.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    count_unread, CreateNotificationRequest, Notification, NotificationFeed, NotificationKind,
};

const NOTIFICATION_COLUMNS: &str =
    "id, title, message, kind, is_read, created_at, target_role, from_admin";

/// Database repository for notification rows.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All notifications addressed to `user_id`, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> Result<NotificationFeed, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM notifications WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
            NOTIFICATION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let notifications: Vec<Notification> = rows.iter().map(notification_from_row).collect();
        Ok(NotificationFeed {
            unread_count: count_unread(&notifications),
            notifications,
        })
    }

    /// Create a notification for a user.
    pub async fn create(
        &self,
        request: &CreateNotificationRequest,
    ) -> Result<Notification, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        // Fixed-width timestamps keep text ordering chronological.
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO notifications (id, user_id, title, message, kind, is_read, created_at, target_role, from_admin) VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&request.user_id)
        .bind(&request.title)
        .bind(&request.message)
        .bind(request.kind.as_str())
        .bind(created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .bind(&request.target_role)
        .bind(request.from_admin.map(|b| b as i32))
        .execute(&self.pool)
        .await?;

        let mut notification =
            Notification::new(id, &request.title, &request.message, request.kind.clone());
        notification.created_at = created_at;
        notification.target_role = request.target_role.clone();
        notification.from_admin = request.from_admin;
        Ok(notification)
    }

    /// Mark one notification as read.
    pub async fn mark_read(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Notification {} not found", id)));
        }
        Ok(())
    }

    /// Mark every notification of a user as read. Returns how many changed.
    pub async fn mark_all_read(&self, user_id: &str) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = 1 WHERE user_id = ? AND is_read = 0")
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Delete one notification.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Notification {} not found", id)));
        }
        Ok(())
    }

    /// Delete every notification of a user. Returns how many were removed.
    pub async fn clear_all(&self, user_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM notifications WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn notification_from_row(row: &sqlx::sqlite::SqliteRow) -> Notification {
    let kind: String = row.get("kind");
    let is_read: i32 = row.get("is_read");
    let created_at: String = row.get("created_at");
    let from_admin: Option<i32> = row.get("from_admin");

    let mut notification = Notification::new(
        row.get::<String, _>("id"),
        row.get::<String, _>("title"),
        row.get::<String, _>("message"),
        NotificationKind::parse(&kind),
    );
    notification.is_read = is_read != 0;
    notification.created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            tracing::warn!("Bad created_at {:?} on {}: {}", created_at, notification.id, e);
            DateTime::<Utc>::default()
        });
    notification.target_role = row.get("target_role");
    notification.from_admin = from_admin.map(|v| v != 0);
    notification
}
