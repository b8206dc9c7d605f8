use crate::domain::models::{AggregatedVideo, Video, ViewRecord};
use crate::error::{AppError, Result};
use crate::repository::VideoRepository;
use crate::services::EngagementService;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

/// Visibility gate, watch-history recorder, and the owner-only write
/// paths that share the gate's ownership check.
#[derive(Clone)]
pub struct VideoService {
    pool: PgPool,
    videos: VideoRepository,
    engagement: EngagementService,
}

impl VideoService {
    pub fn new(pool: PgPool) -> Self {
        let videos = VideoRepository::new(pool.clone());
        let engagement = EngagementService::new(pool.clone());
        Self {
            pool,
            videos,
            engagement,
        }
    }

    /// Visibility gate. Published videos are visible to any
    /// authenticated viewer; unpublished videos only to their owner.
    /// Denials are reported as not-found so private content does not
    /// leak its existence. Runs before any side-effecting read.
    pub async fn authorize_view(&self, viewer_id: Uuid, video_id: Uuid) -> Result<Video> {
        let video = self.fetch_video(video_id).await?;
        if !video.is_visible_to(viewer_id) {
            return Err(AppError::AccessDenied);
        }
        Ok(video)
    }

    /// Idempotently record that the viewer watched the video.
    ///
    /// First watch appends a history row and increments the view counter
    /// in one transaction; both apply or neither. A repeat watch touches
    /// nothing. An increment failure after a successful append aborts
    /// the transaction and surfaces as a consistency failure.
    ///
    /// Only call after `authorize_view` has passed.
    pub async fn record_view(&self, viewer_id: Uuid, video_id: Uuid) -> Result<ViewRecord> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::TransactionFailure(e.to_string()))?;

        let appended = sqlx::query(
            r#"
            INSERT INTO watch_history (user_id, video_id, watched_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, video_id) DO NOTHING
            "#,
        )
        .bind(viewer_id)
        .bind(video_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::TransactionFailure(e.to_string()))?
        .rows_affected();

        if appended == 0 {
            // Already in history: no counter movement either.
            let views: i64 = sqlx::query_scalar("SELECT views FROM videos WHERE id = $1")
                .bind(video_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| AppError::TransactionFailure(e.to_string()))?;
            tx.commit()
                .await
                .map_err(|e| AppError::TransactionFailure(e.to_string()))?;
            return Ok(ViewRecord {
                first_watch: false,
                views,
            });
        }

        // History row went in; the counter must follow or the whole call
        // fails.
        let views: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE videos
            SET views = views + 1
            WHERE id = $1
            RETURNING views
            "#,
        )
        .bind(video_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!(
                viewer = %viewer_id,
                video = %video_id,
                "view counter increment failed after history append: {}",
                e
            );
            AppError::ConsistencyFailure(format!(
                "view counter increment failed after history append: {}",
                e
            ))
        })?;

        let views = views.ok_or_else(|| {
            error!(
                viewer = %viewer_id,
                video = %video_id,
                "video row vanished between history append and counter increment"
            );
            AppError::ConsistencyFailure(format!(
                "video {} missing during view counter increment",
                video_id
            ))
        })?;

        tx.commit()
            .await
            .map_err(|e| AppError::TransactionFailure(e.to_string()))?;

        Ok(ViewRecord {
            first_watch: true,
            views,
        })
    }

    /// Full read path: gate, then recorder, then aggregator.
    pub async fn watch(&self, viewer_id: Uuid, video_id: Uuid) -> Result<AggregatedVideo> {
        let video = self.authorize_view(viewer_id, video_id).await?;
        let record = self.record_view(viewer_id, video.id).await?;

        let mut view = self.engagement.aggregate(video, viewer_id).await?;
        // The aggregate was built from the pre-increment row; reflect the
        // counter this call just committed.
        view.video.views = record.views;
        Ok(view)
    }

    /// Owner-only: register a new (unpublished) video. Media has already
    /// been stored by the upload adapter; only the references land here.
    pub async fn create_video(
        &self,
        owner_id: Uuid,
        title: &str,
        description: &str,
        video_url: &str,
        thumbnail_url: Option<&str>,
        duration_seconds: f64,
    ) -> Result<Video> {
        if title.trim().is_empty() {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        if description.trim().is_empty() {
            return Err(AppError::Validation(
                "description cannot be empty".to_string(),
            ));
        }
        if video_url.trim().is_empty() {
            return Err(AppError::Validation(
                "video file reference is required".to_string(),
            ));
        }

        self.videos
            .create(
                owner_id,
                title,
                description,
                video_url,
                thumbnail_url,
                duration_seconds,
            )
            .await
    }

    /// Owner-only: flip the publish flag.
    pub async fn toggle_publish(&self, actor_id: Uuid, video_id: Uuid) -> Result<Video> {
        let video = self.fetch_owned_video(actor_id, video_id).await?;
        self.videos
            .toggle_publish(video.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("video {} does not exist", video_id)))
    }

    /// Owner-only: update title, description, and optionally the
    /// thumbnail reference.
    pub async fn update_details(
        &self,
        actor_id: Uuid,
        video_id: Uuid,
        title: &str,
        description: &str,
        thumbnail_url: Option<&str>,
    ) -> Result<Video> {
        if title.trim().is_empty() || description.trim().is_empty() {
            return Err(AppError::Validation(
                "title and description are required".to_string(),
            ));
        }

        let video = self.fetch_owned_video(actor_id, video_id).await?;
        self.videos
            .update_details(video.id, title, description, thumbnail_url)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("video {} does not exist", video_id)))
    }

    /// Owner-only: delete the video row. Media cleanup belongs to the
    /// upload adapter.
    pub async fn delete_video(&self, actor_id: Uuid, video_id: Uuid) -> Result<()> {
        let video = self.fetch_owned_video(actor_id, video_id).await?;
        let deleted = self.videos.delete(video.id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!(
                "video {} does not exist",
                video_id
            )));
        }
        Ok(())
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

    /// Shared ownership check for the publish/update/delete paths.
    /// Non-owners get the same not-found-shaped denial as the gate.
    async fn fetch_owned_video(&self, actor_id: Uuid, video_id: Uuid) -> Result<Video> {
        let video = self.fetch_video(video_id).await?;
        if video.owner_id != actor_id {
            return Err(AppError::AccessDenied);
        }
        Ok(video)
    }
}
