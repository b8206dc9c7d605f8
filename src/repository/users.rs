use crate::domain::models::{ProfileSummary, User, WatchHistoryEntry};
use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for User reads. Users are owned by the identity store;
/// this service only reads them (watch-history appends go through the
/// view recorder's transaction).
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, full_name, email, avatar_url, cover_image_url,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, full_name, email, avatar_url, cover_image_url,
                   created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Profile projection embedded in aggregated payloads
    pub async fn profile_summary(&self, id: Uuid) -> Result<Option<ProfileSummary>> {
        let summary = sqlx::query_as::<_, ProfileSummary>(
            r#"
            SELECT id, username, full_name, avatar_url
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(summary)
    }

    /// The viewer's watched videos joined with owner summaries, most
    /// recent first.
    pub async fn watch_history(&self, user_id: Uuid) -> Result<Vec<WatchHistoryEntry>> {
        let entries = sqlx::query_as::<_, WatchHistoryEntry>(
            r#"
            SELECT v.id AS video_id, v.title, v.thumbnail_url, v.duration_seconds,
                   v.views, h.watched_at,
                   u.id AS owner_id, u.username AS owner_username,
                   u.full_name AS owner_full_name, u.avatar_url AS owner_avatar_url
            FROM watch_history h
            JOIN videos v ON v.id = h.video_id
            JOIN users u ON u.id = v.owner_id
            WHERE h.user_id = $1
            ORDER BY h.watched_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
