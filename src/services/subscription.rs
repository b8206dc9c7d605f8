use crate::domain::models::ToggleOutcome;
use crate::error::{AppError, Result};
use crate::repository::UserRepository;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

/// Atomically flips the subscription edge between a subscriber and a
/// channel.
///
/// Correctness under concurrent toggles on the same pair rests on the
/// UNIQUE (subscriber_id, channel_id) constraint, not on the transaction
/// alone: a lost insert race surfaces as a unique violation and is
/// recovered by retrying the opposite branch.
#[derive(Clone)]
pub struct SubscriptionService {
    pool: PgPool,
    users: UserRepository,
}

impl SubscriptionService {
    pub fn new(pool: PgPool) -> Self {
        let users = UserRepository::new(pool.clone());
        Self { pool, users }
    }

    /// Toggle the (actor, channel) subscription edge. Returns the state
    /// the edge ended up in.
    pub async fn toggle(&self, actor_id: Uuid, channel_id: Uuid) -> Result<ToggleOutcome> {
        if channel_id.is_nil() {
            return Err(AppError::Validation("channel id is required".to_string()));
        }
        if actor_id == channel_id {
            return Err(AppError::SelfSubscription);
        }
        if self.users.find_by_id(channel_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "channel {} does not exist",
                channel_id
            )));
        }

        match self.toggle_once(actor_id, channel_id).await {
            Ok(outcome) => Ok(outcome),
            Err(AppError::DuplicateRelationship) => {
                // A concurrent toggle won the insert race; the edge now
                // exists, so this call resolves as the opposite branch.
                warn!(
                    subscriber = %actor_id,
                    channel = %channel_id,
                    "lost subscription insert race, retrying as unsubscribe"
                );
                self.unsubscribe(actor_id, channel_id).await?;
                Ok(ToggleOutcome::Unsubscribed)
            }
            Err(err) => Err(err),
        }
    }

    /// One lookup-then-act pass inside a single transaction. Fails with
    /// `DuplicateRelationship` if a concurrent writer created the row
    /// between the lookup and the insert.
    async fn toggle_once(&self, actor_id: Uuid, channel_id: Uuid) -> Result<ToggleOutcome> {
        let mut tx = self.pool.begin().await.map_err(tx_failure)?;

        let existing: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM subscriptions
            WHERE subscriber_id = $1 AND channel_id = $2
            "#,
        )
        .bind(actor_id)
        .bind(channel_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(tx_failure)?;

        if let Some(subscription_id) = existing {
            sqlx::query("DELETE FROM subscriptions WHERE id = $1")
                .bind(subscription_id)
                .execute(&mut *tx)
                .await
                .map_err(tx_failure)?;
            tx.commit().await.map_err(tx_failure)?;
            return Ok(ToggleOutcome::Unsubscribed);
        }

        let insert = sqlx::query(
            r#"
            INSERT INTO subscriptions (id, subscriber_id, channel_id, created_at)
            VALUES ($1, $2, $3, NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(actor_id)
        .bind(channel_id)
        .execute(&mut *tx)
        .await;

        match insert {
            Ok(_) => {
                tx.commit().await.map_err(tx_failure)?;
                Ok(ToggleOutcome::Subscribed)
            }
            Err(err) if is_unique_violation(&err) => {
                let _ = tx.rollback().await;
                Err(AppError::DuplicateRelationship)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(tx_failure(err))
            }
        }
    }

    async fn unsubscribe(&self, actor_id: Uuid, channel_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM subscriptions
            WHERE subscriber_id = $1 AND channel_id = $2
            "#,
        )
        .bind(actor_id)
        .bind(channel_id)
        .execute(&self.pool)
        .await
        .map_err(tx_failure)?;
        Ok(())
    }
}

/// PostgreSQL unique violation error code: 23505
fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.code().as_deref() == Some("23505"))
        .unwrap_or(false)
}

fn tx_failure(err: sqlx::Error) -> AppError {
    AppError::TransactionFailure(err.to_string())
}
