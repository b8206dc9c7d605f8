use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - owned by the identity store, read-only here except for
/// watch-history appends
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Video entity - publish-gated, with a monotonically non-decreasing
/// view counter
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: f64,
    pub is_published: bool,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// Published videos are visible to any authenticated viewer;
    /// unpublished only to their owner.
    pub fn is_visible_to(&self, viewer_id: Uuid) -> bool {
        self.is_published || self.owner_id == viewer_id
    }
}

/// Subscription entity - at most one row per (subscriber, channel) pair,
/// enforced by a unique constraint
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub channel_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Like entity - count source for the aggregator
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
    pub id: Uuid,
    pub video_id: Uuid,
    pub liked_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Result of a subscription toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Subscribed,
    Unsubscribed,
}

/// Projection of a user suitable for embedding in aggregated payloads
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProfileSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

/// Composite read view for a single video: the video itself, its owner's
/// profile summary, and engagement counts computed at read time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedVideo {
    pub video: Video,
    pub channel: ProfileSummary,
    pub subscriber_count: i64,
    pub is_subscribed: bool,
    pub like_count: i64,
    pub is_liked: bool,
}

/// Subscribers of a channel, paired with the count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSubscribers {
    pub channel_id: Uuid,
    pub subscribers: Vec<ProfileSummary>,
    pub subscriber_count: i64,
}

/// Channels a subscriber follows, paired with the count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribedChannels {
    pub subscriber_id: Uuid,
    pub channels: Vec<ProfileSummary>,
    pub channel_count: i64,
}

/// Channel profile view: profile fields plus relationship counts for the
/// requesting viewer
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChannelProfile {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub subscriber_count: i64,
    pub subscribed_to_count: i64,
    pub is_subscribed: bool,
}

/// A watched video joined with its owner's profile summary
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchHistoryEntry {
    pub video_id: Uuid,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: f64,
    pub views: i64,
    pub watched_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar_url: Option<String>,
}

/// Outcome of a view-recording call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRecord {
    /// True if this call was the viewer's first watch of the video
    pub first_watch: bool,
    /// View counter after the call
    pub views: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(owner_id: Uuid, is_published: bool) -> Video {
        Video {
            id: Uuid::new_v4(),
            owner_id,
            title: "t".into(),
            description: String::new(),
            video_url: "https://cdn.example/v.mp4".into(),
            thumbnail_url: None,
            duration_seconds: 0.0,
            is_published,
            views: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn published_video_visible_to_anyone() {
        let v = video(Uuid::new_v4(), true);
        assert!(v.is_visible_to(Uuid::new_v4()));
    }

    #[test]
    fn unpublished_video_visible_only_to_owner() {
        let owner = Uuid::new_v4();
        let v = video(owner, false);
        assert!(v.is_visible_to(owner));
        assert!(!v.is_visible_to(Uuid::new_v4()));
    }

    #[test]
    fn toggle_outcome_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ToggleOutcome::Subscribed).unwrap(),
            "\"subscribed\""
        );
        assert_eq!(
            serde_json::to_string(&ToggleOutcome::Unsubscribed).unwrap(),
            "\"unsubscribed\""
        );
    }
}
