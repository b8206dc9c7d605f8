use crate::domain::models::{
    AggregatedVideo, ChannelProfile, ChannelSubscribers, SubscribedChannels, Video,
    WatchHistoryEntry,
};
use crate::error::{AppError, Result};
use crate::repository::{LikeRepository, SubscriptionRepository, UserRepository, VideoRepository};
use sqlx::PgPool;
use uuid::Uuid;

/// Builds composite read views by joining relationship and reaction rows
/// at read time.
///
/// There are no denormalized counters anywhere in this service: every
/// count is a COUNT(*) over the underlying rows, so the numbers can
/// never drift from the relationships they summarize.
#[derive(Clone)]
pub struct EngagementService {
    users: UserRepository,
    videos: VideoRepository,
    subscriptions: SubscriptionRepository,
    likes: LikeRepository,
}

impl EngagementService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            videos: VideoRepository::new(pool.clone()),
            subscriptions: SubscriptionRepository::new(pool.clone()),
            likes: LikeRepository::new(pool),
        }
    }

    /// Composite view for a single video: owner summary, subscriber
    /// count, like count, and the viewer's own flags. Applies the same
    /// visibility rule as the gate so an unpublished video's engagement
    /// never leaks past its owner.
    pub async fn build_video_view(
        &self,
        video_id: Uuid,
        viewer_id: Uuid,
    ) -> Result<AggregatedVideo> {
        let video = self.fetch_video(video_id).await?;
        if !video.is_visible_to(viewer_id) {
            return Err(AppError::AccessDenied);
        }
        self.aggregate(video, viewer_id).await
    }

    /// Same composite view, for a video the caller already fetched
    /// through the gate.
    pub async fn aggregate(&self, video: Video, viewer_id: Uuid) -> Result<AggregatedVideo> {
        let channel = self
            .users
            .profile_summary(video.owner_id)
            .await?
            .ok_or_else(|| {
                AppError::ConsistencyFailure(format!(
                    "video {} references missing owner {}",
                    video.id, video.owner_id
                ))
            })?;

        let subscriber_count = self.subscriptions.count_for_channel(video.owner_id).await?;
        let is_subscribed = self
            .subscriptions
            .is_subscribed(viewer_id, video.owner_id)
            .await?;
        let like_count = self.likes.count_for_video(video.id).await?;
        let is_liked = self.likes.has_user_liked(viewer_id, video.id).await?;

        Ok(AggregatedVideo {
            video,
            channel,
            subscriber_count,
            is_subscribed,
            like_count,
            is_liked,
        })
    }

    /// Who subscribes to a channel, and how many, in one pass.
    pub async fn channel_subscribers(&self, channel_id: Uuid) -> Result<ChannelSubscribers> {
        if self.users.find_by_id(channel_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "channel {} does not exist",
                channel_id
            )));
        }

        let subscribers = self.subscriptions.subscribers_of(channel_id).await?;
        let subscriber_count = subscribers.len() as i64;

        Ok(ChannelSubscribers {
            channel_id,
            subscribers,
            subscriber_count,
        })
    }

    /// Which channels a user follows, and how many, in one pass.
    pub async fn subscribed_channels(&self, subscriber_id: Uuid) -> Result<SubscribedChannels> {
        if self.users.find_by_id(subscriber_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "subscriber {} does not exist",
                subscriber_id
            )));
        }

        let channels = self.subscriptions.channels_of(subscriber_id).await?;
        let channel_count = channels.len() as i64;

        Ok(SubscribedChannels {
            subscriber_id,
            channels,
            channel_count,
        })
    }

    /// Channel profile by username, with relationship counts relative to
    /// the requesting viewer.
    pub async fn channel_profile(&self, username: &str, viewer_id: Uuid) -> Result<ChannelProfile> {
        if username.trim().is_empty() {
            return Err(AppError::Validation("username is required".to_string()));
        }

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("channel {} does not exist", username)))?;

        let subscriber_count = self.subscriptions.count_for_channel(user.id).await?;
        let subscribed_to_count = self.subscriptions.count_for_subscriber(user.id).await?;
        let is_subscribed = self.subscriptions.is_subscribed(viewer_id, user.id).await?;

        Ok(ChannelProfile {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            avatar_url: user.avatar_url,
            cover_image_url: user.cover_image_url,
            subscriber_count,
            subscribed_to_count,
            is_subscribed,
        })
    }

    /// The viewer's watched videos joined with owner summaries, most
    /// recent first.
    pub async fn watch_history(&self, viewer_id: Uuid) -> Result<Vec<WatchHistoryEntry>> {
        if self.users.find_by_id(viewer_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "user {} does not exist",
                viewer_id
            )));
        }

        self.users.watch_history(viewer_id).await
    }

    async fn fetch_video(&self, video_id: Uuid) -> Result<Video> {
        if video_id.is_nil() {
            return Err(AppError::Validation("video id is required".to_string()));
        }
        self.videos
            .find_by_id(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("video {} does not exist", video_id)))
    }
}
