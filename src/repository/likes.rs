use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Read-side repository for Like rows, used by the aggregator as a count
/// source only.
#[derive(Clone)]
pub struct LikeRepository {
    pool: PgPool,
}

impl LikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get like count for a video
    pub async fn count_for_video(&self, video_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM likes
            WHERE video_id = $1
            "#,
        )
        .bind(video_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Check if a user has liked a video
    pub async fn has_user_liked(&self, user_id: Uuid, video_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM likes
                WHERE liked_by = $1 AND video_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
