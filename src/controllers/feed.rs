use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::feed::{
    CreateGroupRequest, FeedGroupResponse, FeedHealth, FeedHealthStats, FeedResponse,
    FeedService, FeedServiceApi, SetRefreshIntervalRequest, UpdateFeedHealthRequest,
};
use crate::domain::ingestion::{
    AddFeedRequest, IngestionService, IngestionServiceApi, RefreshSummary,
};
use crate::{error::AppResult, infrastructure::auth::AuthUser};

pub struct FeedController {
    feed_service: Arc<FeedService>,
    ingestion_service: Arc<IngestionService>,
}

impl FeedController {
    pub fn new(feed_service: Arc<FeedService>, ingestion_service: Arc<IngestionService>) -> Self {
        Self {
            feed_service,
            ingestion_service,
        }
    }

    /// GET /api/feeds - List user's feeds
    pub async fn list_feeds(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<Vec<FeedResponse>>> {
        let feeds = controller
            .feed_service
            .get_user_feeds(auth_user.user_id)
            .await?;
        Ok(Json(feeds))
    }

    /// POST /api/feeds - Subscribe to a feed and ingest its articles
    pub async fn add_feed(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<AddFeedRequest>,
    ) -> AppResult<(StatusCode, Json<FeedResponse>)> {
        let feed = controller
            .ingestion_service
            .add_feed(auth_user.user_id, request)
            .await?;
        Ok((StatusCode::CREATED, Json(FeedResponse::from(feed))))
    }

    /// DELETE /api/feeds/{feedId} - Delete feed
    pub async fn delete_feed(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(feed_id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        controller
            .feed_service
            .delete_feed(auth_user.user_id, feed_id)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// POST /api/feeds/refresh - Re-ingest all of the user's feeds
    pub async fn refresh_feeds(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<RefreshSummary>> {
        let summary = controller
            .ingestion_service
            .refresh_feeds(auth_user.user_id)
            .await?;
        Ok(Json(summary))
    }

    /// GET /api/feeds/health - Health view over the user's feeds
    pub async fn load_feed_health(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<Vec<FeedHealth>>> {
        let health = controller
            .feed_service
            .load_feed_health(auth_user.user_id)
            .await?;
        Ok(Json(health))
    }

    /// GET /api/feeds/health/stats - Aggregate health counts
    pub async fn get_health_stats(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<FeedHealthStats>> {
        let stats = controller
            .feed_service
            .get_feed_health_stats(auth_user.user_id)
            .await?;
        Ok(Json(stats))
    }

    /// GET /api/feeds/health/due - Feeds whose refresh interval has elapsed
    pub async fn feeds_needing_refresh(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<Vec<FeedHealth>>> {
        let due = controller
            .feed_service
            .feeds_needing_refresh(auth_user.user_id)
            .await?;
        Ok(Json(due))
    }

    /// PATCH /api/feeds/{feedId}/health - Caller-driven health override
    pub async fn update_feed_health(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(feed_id): Path<Uuid>,
        Json(request): Json<UpdateFeedHealthRequest>,
    ) -> AppResult<StatusCode> {
        controller
            .feed_service
            .update_feed_health(
                auth_user.user_id,
                feed_id,
                request.status,
                request.error_message.as_deref(),
            )
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// PATCH /api/feeds/{feedId}/refresh-interval
    pub async fn set_refresh_interval(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(feed_id): Path<Uuid>,
        Json(request): Json<SetRefreshIntervalRequest>,
    ) -> AppResult<StatusCode> {
        controller
            .feed_service
            .set_feed_refresh_interval(auth_user.user_id, feed_id, request.minutes)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// GET /api/groups - List user's feed groups
    pub async fn list_groups(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<Vec<FeedGroupResponse>>> {
        let groups = controller
            .feed_service
            .get_user_groups(auth_user.user_id)
            .await?;
        Ok(Json(groups))
    }

    /// POST /api/groups - Create a feed group
    pub async fn create_group(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<CreateGroupRequest>,
    ) -> AppResult<(StatusCode, Json<FeedGroupResponse>)> {
        let group = controller
            .feed_service
            .create_group(auth_user.user_id, &request.name)
            .await?;
        Ok((StatusCode::CREATED, Json(group)))
    }

    /// DELETE /api/groups/{groupId} - Delete a feed group
    pub async fn delete_group(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(group_id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        controller
            .feed_service
            .delete_group(auth_user.user_id, group_id)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
