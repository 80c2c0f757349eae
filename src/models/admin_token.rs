use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::db::decode_timestamp;

/// Raw `admin_tokens` row.
#[derive(Debug, FromRow)]
pub struct AdminTokenRow {
    pub id: i64,
    pub token: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct AdminToken {
    pub id: i64,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AdminTokenRow> for AdminToken {
    type Error = chrono::ParseError;

    fn try_from(row: AdminTokenRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            token: row.token,
            created_at: decode_timestamp(&row.created_at)?,
        })
    }
}
