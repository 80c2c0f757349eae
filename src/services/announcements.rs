use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    db::encode_timestamp,
    error::{AppError, AppResult},
    models::announcement::{Announcement, AnnouncementRow},
};

pub struct AnnouncementService;

impl AnnouncementService {
    /// Insert a new announcement stamped with the current UTC time.
    pub async fn create(pool: &SqlitePool, title: &str, content: &str) -> AppResult<Announcement> {
        if title.is_empty() || content.is_empty() {
            return Err(AppError::validation("Title and content are required"));
        }

        let created_at = Utc::now();
        let id = sqlx::query("INSERT INTO announcements (title, content, created_at) VALUES (?, ?, ?)")
            .bind(title)
            .bind(content)
            .bind(encode_timestamp(created_at))
            .execute(pool)
            .await?
            .last_insert_rowid();

        Ok(Announcement {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created_at,
        })
    }

    /// Most recent first; rows sharing a timestamp are ordered by id, newest first.
    pub async fn list(pool: &SqlitePool, limit: i64) -> AppResult<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(
            "SELECT id, title, content, created_at FROM announcements
             ORDER BY created_at DESC, id DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let announcements = rows
            .into_iter()
            .map(Announcement::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(announcements)
    }
}
