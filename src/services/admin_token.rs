use std::io::ErrorKind;
use std::path::Path;

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    db::encode_timestamp,
    error::{AppResult, TokenStoreError},
    models::admin_token::{AdminToken, AdminTokenRow},
};

pub struct AdminTokenService;

impl AdminTokenService {
    /// Bootstrap the admin credential from its sidecar file.
    ///
    /// An existing file is authoritative: its contents are used verbatim and recorded in
    /// storage if missing. Without a file a fresh UUIDv4 is generated, written to the
    /// file, then recorded. Call once at startup, before serving.
    pub async fn ensure(pool: &SqlitePool, sidecar_path: &Path) -> Result<String, TokenStoreError> {
        let display_path = sidecar_path.display().to_string();

        match tokio::fs::read_to_string(sidecar_path).await {
            Ok(token) => {
                if token.trim() != token {
                    tracing::warn!(
                        "admin token file {display_path} has surrounding whitespace; it is used verbatim"
                    );
                }
                Self::register(pool, &token).await?;
                tracing::info!("Admin token loaded from {display_path}");
                Ok(token)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let token = Uuid::new_v4().to_string();
                write_sidecar(sidecar_path, &token)
                    .await
                    .map_err(|source| TokenStoreError::Write {
                        path: display_path.clone(),
                        source,
                    })?;
                Self::register(pool, &token).await?;
                tracing::info!("Generated new admin token at {display_path}");
                Ok(token)
            }
            Err(source) => Err(TokenStoreError::Read {
                path: display_path,
                source,
            }),
        }
    }

    /// Record a token. Registering an already-known token is a no-op, not an error.
    pub async fn register(pool: &SqlitePool, token: &str) -> Result<(), TokenStoreError> {
        if token.is_empty() {
            return Err(TokenStoreError::EmptyToken);
        }

        sqlx::query(
            "INSERT INTO admin_tokens (token, created_at) VALUES (?, ?)
             ON CONFLICT(token) DO NOTHING",
        )
        .bind(token)
        .bind(encode_timestamp(Utc::now()))
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn exists(pool: &SqlitePool, token: &str) -> Result<bool, sqlx::Error> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM admin_tokens WHERE token = ? LIMIT 1")
            .bind(token)
            .fetch_optional(pool)
            .await?;
        Ok(id.is_some())
    }

    /// All registered tokens, oldest first.
    pub async fn list(pool: &SqlitePool) -> AppResult<Vec<AdminToken>> {
        let rows = sqlx::query_as::<_, AdminTokenRow>(
            "SELECT id, token, created_at FROM admin_tokens ORDER BY id",
        )
        .fetch_all(pool)
        .await?;

        let tokens = rows
            .into_iter()
            .map(AdminToken::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tokens)
    }
}

async fn write_sidecar(path: &Path, token: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, token).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o640)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_test_db;

    async fn token_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM admin_tokens")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_generates_token_when_sidecar_missing() {
        let pool = setup_test_db().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("admin.token");

        let token = AdminTokenService::ensure(&pool, &path).await.unwrap();

        assert!(Uuid::parse_str(&token).is_ok());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), token);
        assert!(AdminTokenService::exists(&pool, &token).await.unwrap());
        assert_eq!(token_count(&pool).await, 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_generated_sidecar_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let pool = setup_test_db().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin.token");
        AdminTokenService::ensure(&pool, &path).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[tokio::test]
    async fn test_repeated_bootstrap_is_stable() {
        let pool = setup_test_db().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin.token");

        let first = AdminTokenService::ensure(&pool, &path).await.unwrap();
        let second = AdminTokenService::ensure(&pool, &path).await.unwrap();
        let third = AdminTokenService::ensure(&pool, &path).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(token_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_preseeded_sidecar_is_used_verbatim() {
        let pool = setup_test_db().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin.token");
        std::fs::write(&path, "operator-chosen-secret").unwrap();

        let token = AdminTokenService::ensure(&pool, &path).await.unwrap();

        assert_eq!(token, "operator-chosen-secret");
        assert!(AdminTokenService::exists(&pool, "operator-chosen-secret").await.unwrap());
    }

    #[tokio::test]
    async fn test_sidecar_survives_storage_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin.token");

        let old_pool = setup_test_db().await;
        let token = AdminTokenService::ensure(&old_pool, &path).await.unwrap();

        let fresh_pool = setup_test_db().await;
        assert!(!AdminTokenService::exists(&fresh_pool, &token).await.unwrap());
        let reloaded = AdminTokenService::ensure(&fresh_pool, &path).await.unwrap();

        assert_eq!(reloaded, token);
        assert!(AdminTokenService::exists(&fresh_pool, &token).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_sidecar_is_rejected() {
        let pool = setup_test_db().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin.token");
        std::fs::write(&path, "").unwrap();

        let err = AdminTokenService::ensure(&pool, &path).await.unwrap_err();
        assert!(matches!(err, TokenStoreError::EmptyToken));
        assert_eq!(token_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_unreadable_sidecar_is_an_error() {
        let pool = setup_test_db().await;
        let dir = tempfile::tempdir().unwrap();

        // A directory in place of the file cannot be read as text.
        let err = AdminTokenService::ensure(&pool, dir.path()).await.unwrap_err();
        assert!(matches!(err, TokenStoreError::Read { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unwritable_sidecar_is_an_error() {
        let pool = setup_test_db().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin.token");
        // Dangling link: reading reports NotFound, writing through it cannot succeed.
        std::os::unix::fs::symlink(dir.path().join("missing").join("admin.token"), &path).unwrap();

        let err = AdminTokenService::ensure(&pool, &path).await.unwrap_err();
        assert!(matches!(err, TokenStoreError::Write { .. }));
        assert_eq!(token_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_register_is_noop() {
        let pool = setup_test_db().await;
        AdminTokenService::register(&pool, "abc").await.unwrap();
        AdminTokenService::register(&pool, "abc").await.unwrap();
        assert_eq!(token_count(&pool).await, 1);

        AdminTokenService::register(&pool, "def").await.unwrap();

        let tokens = AdminTokenService::list(&pool).await.unwrap();
        let values: Vec<&str> = tokens.iter().map(|t| t.token.as_str()).collect();
        assert_eq!(values, vec!["abc", "def"]);
    }

    #[tokio::test]
    async fn test_unknown_token_does_not_exist() {
        let pool = setup_test_db().await;
        AdminTokenService::register(&pool, "abc").await.unwrap();
        assert!(!AdminTokenService::exists(&pool, "abd").await.unwrap());
        assert!(!AdminTokenService::exists(&pool, "").await.unwrap());
    }
}
