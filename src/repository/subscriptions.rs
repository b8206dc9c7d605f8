use crate::domain::models::ProfileSummary;
use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Read-side repository for Subscription rows.
///
/// Writes go exclusively through the toggle service's transaction; every
/// count here is computed from the rows at read time, never from a
/// denormalized counter.
#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Number of subscribers of a channel
    pub async fn count_for_channel(&self, channel_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM subscriptions
            WHERE channel_id = $1
            "#,
        )
        .bind(channel_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Number of channels a user is subscribed to
    pub async fn count_for_subscriber(&self, subscriber_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM subscriptions
            WHERE subscriber_id = $1
            "#,
        )
        .bind(subscriber_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Check if a user is subscribed to a channel
    pub async fn is_subscribed(&self, subscriber_id: Uuid, channel_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM subscriptions
                WHERE subscriber_id = $1 AND channel_id = $2
            )
            "#,
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Profile summaries of everyone subscribed to a channel, newest
    /// subscription first.
    pub async fn subscribers_of(&self, channel_id: Uuid) -> Result<Vec<ProfileSummary>> {
        let subscribers = sqlx::query_as::<_, ProfileSummary>(
            r#"
            SELECT u.id, u.username, u.full_name, u.avatar_url
            FROM subscriptions s
            JOIN users u ON u.id = s.subscriber_id
            WHERE s.channel_id = $1
            ORDER BY s.created_at DESC, u.id
            "#,
        )
        .bind(channel_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subscribers)
    }

    /// Profile summaries of every channel a user follows, newest
    /// subscription first.
    pub async fn channels_of(&self, subscriber_id: Uuid) -> Result<Vec<ProfileSummary>> {
        let channels = sqlx::query_as::<_, ProfileSummary>(
            r#"
            SELECT u.id, u.username, u.full_name, u.avatar_url
            FROM subscriptions s
            JOIN users u ON u.id = s.channel_id
            WHERE s.subscriber_id = $1
            ORDER BY s.created_at DESC, u.id
            "#,
        )
        .bind(subscriber_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(channels)
    }
}
