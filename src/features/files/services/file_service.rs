use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::core::error::Result;
use crate::features::files::models::File;

/// Storage interface for uploaded files.
///
/// Handlers depend on this trait rather than on the concrete store, so the
/// backing technology can change without touching the request path.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Persist a new file, assigning a fresh id and the current timestamp.
    async fn insert(&self, name: &str, content: Vec<u8>, content_type: &str) -> Result<File>;

    /// Fetch a file by id, `None` if no such row exists.
    async fn fetch_by_id(&self, id: i64) -> Result<Option<File>>;

    /// Up to `limit` most-recently-inserted files, newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<File>>;
}

/// sqlx-backed implementation of [`FileRepository`]
pub struct FileService {
    pool: SqlitePool,
}

impl FileService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for FileService {
    async fn insert(&self, name: &str, content: Vec<u8>, content_type: &str) -> Result<File> {
        let file = sqlx::query_as::<_, File>(
            r#"
            INSERT INTO files (name, content, content_type, uploaded_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, name, content, content_type, uploaded_at
            "#,
        )
        .bind(name)
        .bind(content)
        .bind(content_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!(
            "File persisted: id={}, name={}, content_type={}, size={}",
            file.id,
            file.name,
            file.content_type,
            file.content.len()
        );

        Ok(file)
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<File>> {
        let file = sqlx::query_as::<_, File>(
            r#"
            SELECT id, name, content, content_type, uploaded_at
            FROM files
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<File>> {
        let files = sqlx::query_as::<_, File>(
            r#"
            SELECT id, name, content, content_type, uploaded_at
            FROM files
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_service() -> FileService {
        // A single connection keeps every query on the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        FileService::new(pool)
    }

    #[tokio::test]
    async fn test_insert_fetch_round_trip() {
        let service = test_service().await;

        let inserted = service
            .insert("a.png", vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10], "image/png")
            .await
            .unwrap();

        let fetched = service.fetch_by_id(inserted.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, inserted.id);
        assert_eq!(fetched.name, "a.png");
        assert_eq!(fetched.content, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(fetched.content_type, "image/png");
        assert_eq!(fetched.uploaded_at, inserted.uploaded_at);
    }

    #[tokio::test]
    async fn test_fetch_unknown_id_is_none() {
        let service = test_service().await;
        assert!(service.fetch_by_id(999_999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_assigned_monotonically() {
        let service = test_service().await;
        let first = service.insert("a.png", vec![1], "image/png").await.unwrap();
        let second = service.insert("b.png", vec![2], "image/png").await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_list_recent_returns_newest_first() {
        let service = test_service().await;

        let mut ids = Vec::new();
        for i in 0..7 {
            let file = service
                .insert(&format!("file-{}.png", i), vec![i], "image/png")
                .await
                .unwrap();
            ids.push(file.id);
        }

        let recent = service.list_recent(5).await.unwrap();
        assert_eq!(recent.len(), 5);

        let expected: Vec<i64> = ids.iter().rev().take(5).copied().collect();
        let actual: Vec<i64> = recent.iter().map(|f| f.id).collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_non_utf8_content_round_trips() {
        let service = test_service().await;
        let payload = vec![0xff, 0xfe, 0x00, 0x89, 0x50, 0x4e, 0x47];

        let inserted = service
            .insert("blob.gif", payload.clone(), "image/gif")
            .await
            .unwrap();

        let fetched = service.fetch_by_id(inserted.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, payload);
    }
}
