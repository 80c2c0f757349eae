use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::decode_timestamp;

pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const MAX_LIST_LIMIT: i64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Raw `announcements` row; `created_at` is stored as text.
#[derive(Debug, FromRow)]
pub struct AnnouncementRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

impl TryFrom<AnnouncementRow> for Announcement {
    type Error = chrono::ParseError;

    fn try_from(row: AnnouncementRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            content: row.content,
            created_at: decode_timestamp(&row.created_at)?,
        })
    }
}

/// Body for POST /admin/announcements. Missing fields decode as empty and fail validation.
#[derive(Debug, Deserialize)]
pub struct CreateAnnouncementRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Query params for the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Kept as raw text so that garbage falls back to the default instead of a 400.
    pub limit: Option<String>,
}

impl ListQuery {
    /// Effective row limit. Only a plain run of ASCII digits counts: zero falls back to
    /// the default (100) and anything above 1000, however long, is capped at 1000.
    /// Signs, spaces and other text fall back to the default.
    pub fn limit(&self) -> i64 {
        let Some(raw) = self.limit.as_deref() else {
            return DEFAULT_LIST_LIMIT;
        };
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return DEFAULT_LIST_LIMIT;
        }

        match raw.parse::<i64>() {
            Ok(0) => DEFAULT_LIST_LIMIT,
            Ok(n) if n <= MAX_LIST_LIMIT => n,
            // Either above the cap or too long for i64.
            _ => MAX_LIST_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>) -> ListQuery {
        ListQuery {
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn test_limit_defaults() {
        assert_eq!(query(None).limit(), 100);
        assert_eq!(query(Some("")).limit(), 100);
        assert_eq!(query(Some("abc")).limit(), 100);
        assert_eq!(query(Some("0")).limit(), 100);
        assert_eq!(query(Some("-3")).limit(), 100);
        assert_eq!(query(Some("2.5")).limit(), 100);
        assert_eq!(query(Some("+5")).limit(), 100);
        assert_eq!(query(Some(" 5")).limit(), 100);
        assert_eq!(query(Some("5 ")).limit(), 100);
    }

    #[test]
    fn test_limit_in_range_and_capped() {
        assert_eq!(query(Some("1")).limit(), 1);
        assert_eq!(query(Some("250")).limit(), 250);
        assert_eq!(query(Some("1000")).limit(), 1000);
        assert_eq!(query(Some("5000")).limit(), 1000);
        assert_eq!(query(Some("007")).limit(), 7);
        assert_eq!(query(Some("99999999999")).limit(), 1000);
        assert_eq!(query(Some("99999999999999999999")).limit(), 1000);
    }

    #[test]
    fn test_create_request_missing_fields_are_empty() {
        let req: CreateAnnouncementRequest = serde_json::from_str(r#"{"title":"Exam"}"#).unwrap();
        assert_eq!(req.title, "Exam");
        assert!(req.content.is_empty());
    }

    #[test]
    fn test_row_with_bad_timestamp_is_rejected() {
        let row = AnnouncementRow {
            id: 1,
            title: "t".into(),
            content: "c".into(),
            created_at: "yesterday".into(),
        };
        assert!(Announcement::try_from(row).is_err());
    }
}
