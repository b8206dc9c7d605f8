use crate::domain::models::Video;
use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for Video rows
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            SELECT id, owner_id, title, description, video_url, thumbnail_url,
                   duration_seconds, is_published, views, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    /// New videos start unpublished; the owner flips the publish flag
    /// separately.
    pub async fn create(
        &self,
        owner_id: Uuid,
        title: &str,
        description: &str,
        video_url: &str,
        thumbnail_url: Option<&str>,
        duration_seconds: f64,
    ) -> Result<Video> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos (owner_id, title, description, video_url, thumbnail_url,
                                duration_seconds, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE)
            RETURNING id, owner_id, title, description, video_url, thumbnail_url,
                      duration_seconds, is_published, views, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(title)
        .bind(description)
        .bind(video_url)
        .bind(thumbnail_url)
        .bind(duration_seconds)
        .fetch_one(&self.pool)
        .await?;

        Ok(video)
    }

    /// Flip the publish flag. Ownership is checked by the caller.
    pub async fn toggle_publish(&self, id: Uuid) -> Result<Option<Video>> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos
            SET is_published = NOT is_published, updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, title, description, video_url, thumbnail_url,
                      duration_seconds, is_published, views, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    /// Update title/description/thumbnail. Ownership is checked by the
    /// caller.
    pub async fn update_details(
        &self,
        id: Uuid,
        title: &str,
        description: &str,
        thumbnail_url: Option<&str>,
    ) -> Result<Option<Video>> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos
            SET title = $2,
                description = $3,
                thumbnail_url = COALESCE($4, thumbnail_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, title, description, video_url, thumbnail_url,
                      duration_seconds, is_published, views, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(thumbnail_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }
}
