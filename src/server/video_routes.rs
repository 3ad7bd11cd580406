//! Video listing, publishing and owner-gated mutations.

use super::error::ApiError;
use super::multipart::FormData;
use super::response;
use super::session::Session;
use super::state::ServerState;
use super::ensure_object_id;
use crate::content_store::{Video, VideoQuery, VideoSortField, VideoUpdate};
use crate::media_store::MediaKind;

use axum::extract::{Multipart, Path, Query, State};
use axum::response::Response;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ListVideosParams {
    page: Option<u32>,
    limit: Option<u32>,
    query: Option<String>,
    sort_by: Option<String>,
    sort_type: Option<String>,
    user_id: Option<String>,
}

async fn get_all_videos(
    session: Option<Session>,
    State(state): State<ServerState>,
    Query(params): Query<ListVideosParams>,
) -> Result<Response, ApiError> {
    let mut query = VideoQuery {
        page: params.page.unwrap_or(1).max(1),
        limit: params.limit.unwrap_or(10).clamp(1, 100),
        ..VideoQuery::default()
    };

    if let Some(user_id) = params.user_id.filter(|id| !id.is_empty()) {
        ensure_object_id(&user_id, "userId")?;
        // Owners browsing their own channel also see unpublished videos.
        query.include_unpublished = session
            .as_ref()
            .map(|s| s.user_id() == user_id)
            .unwrap_or(false);
        query.owner_id = Some(user_id);
    }

    if let Some(text) = params
        .query
        .map(|q| q.trim().to_owned())
        .filter(|q| !q.is_empty())
    {
        query.text = Some(text);
    }

    if let Some(field) = params.sort_by.as_deref().and_then(VideoSortField::parse) {
        query.sort_by = field;
    }
    query.ascending = params
        .sort_type
        .as_deref()
        .map(|s| s.eq_ignore_ascii_case("asc"))
        .unwrap_or(false);

    let page = state.store.list_videos(&query)?;
    Ok(response::ok("Videos fetched successfully", page))
}

fn parse_duration(form: &FormData) -> Result<Option<f64>, ApiError> {
    match form.trimmed("duration") {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ApiError::Validation("Invalid duration".to_owned())),
    }
}

async fn publish_a_video(
    session: Session,
    State(state): State<ServerState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = FormData::read(multipart).await?;

    let title = form
        .trimmed("title")
        .ok_or_else(|| ApiError::Validation("Title can not be empty".to_owned()))?;
    let description = form.text("description").unwrap_or("").trim().to_owned();

    let video_bytes = form
        .file("videoFile")
        .ok_or_else(|| ApiError::Validation("Video file is required".to_owned()))?;
    let video_url = state.media_store.store(video_bytes, MediaKind::Video)?.url;

    let thumbnail = match form.file("thumbnail") {
        Some(bytes) => Some(state.media_store.store(bytes, MediaKind::Image)?.url),
        None => None,
    };
    let duration = parse_duration(&form)?.unwrap_or(0.0);

    let video = Video::new(
        session.user_id(),
        title.to_owned(),
        description,
        video_url,
        thumbnail,
        duration,
    );
    state.store.create_video(&video)?;

    let created = state
        .store
        .get_video_with_owner(&video.id)?
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("Created video not found")))?;
    Ok(response::created("Video published successfully", created))
}

async fn get_video_by_id(
    session: Option<Session>,
    State(state): State<ServerState>,
    Path(video_id): Path<String>,
) -> Result<Response, ApiError> {
    ensure_object_id(&video_id, "videoId")?;

    let video = state
        .store
        .get_video(&video_id)?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_owned()))?;

    let viewer_is_owner = session
        .as_ref()
        .map(|s| s.user_id() == video.owner_id)
        .unwrap_or(false);
    if !video.is_published && !viewer_is_owner {
        // Unpublished videos are invisible to everyone but the owner.
        return Err(ApiError::NotFound("Video not found".to_owned()));
    }

    if let Some(session) = &session {
        if !viewer_is_owner {
            state.store.increment_views(&video_id)?;
        }
        state.store.record_watch(session.user_id(), &video_id)?;
    }

    let video = state
        .store
        .get_video_with_owner(&video_id)?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_owned()))?;
    Ok(response::ok("Video fetched successfully", video))
}

async fn update_video(
    session: Session,
    State(state): State<ServerState>,
    Path(video_id): Path<String>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    ensure_object_id(&video_id, "videoId")?;

    let existing = state
        .store
        .get_video(&video_id)?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_owned()))?;
    if existing.owner_id != session.user_id() {
        return Err(ApiError::Forbidden(
            "You are not allowed to update this video".to_owned(),
        ));
    }

    let form = FormData::read(multipart).await?;
    let mut update = VideoUpdate {
        title: form.trimmed("title").map(str::to_owned),
        description: form.text("description").map(|d| d.trim().to_owned()),
        duration: parse_duration(&form)?,
        ..VideoUpdate::default()
    };
    if let Some(bytes) = form.file("thumbnail") {
        update.thumbnail = Some(state.media_store.store(bytes, MediaKind::Image)?.url);
    }
    if let Some(bytes) = form.file("videoFile") {
        update.video_file = Some(state.media_store.store(bytes, MediaKind::Video)?.url);
    }
    if update.is_empty() {
        return Err(ApiError::Validation("Nothing to update".to_owned()));
    }

    state.store.update_video(&video_id, &update)?;
    let updated = state
        .store
        .get_video_with_owner(&video_id)?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_owned()))?;
    Ok(response::ok("Video updated successfully", updated))
}

async fn delete_video(
    session: Session,
    State(state): State<ServerState>,
    Path(video_id): Path<String>,
) -> Result<Response, ApiError> {
    ensure_object_id(&video_id, "videoId")?;

    let existing = state
        .store
        .get_video(&video_id)?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_owned()))?;
    if existing.owner_id != session.user_id() {
        return Err(ApiError::Forbidden(
            "You are not allowed to delete this video".to_owned(),
        ));
    }

    state.store.delete_video(&video_id)?;

    // Stored files are cleaned up best-effort; a leftover file is harmless.
    if let Err(err) = state.media_store.delete(&existing.video_file) {
        debug!("Failed to delete video file {}: {}", existing.video_file, err);
    }
    if let Some(thumbnail) = &existing.thumbnail {
        if let Err(err) = state.media_store.delete(thumbnail) {
            debug!("Failed to delete thumbnail {}: {}", thumbnail, err);
        }
    }

    Ok(response::ok(
        "Video deleted successfully",
        serde_json::Value::Null,
    ))
}

async fn toggle_publish_status(
    session: Session,
    State(state): State<ServerState>,
    Path(video_id): Path<String>,
) -> Result<Response, ApiError> {
    ensure_object_id(&video_id, "videoId")?;

    let video = state
        .store
        .get_video(&video_id)?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_owned()))?;
    if video.owner_id != session.user_id() {
        return Err(ApiError::Forbidden(
            "You are not allowed to change publish status".to_owned(),
        ));
    }

    state
        .store
        .set_video_published(&video_id, !video.is_published)?;
    let updated = state
        .store
        .get_video_with_owner(&video_id)?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_owned()))?;
    Ok(response::ok("Video publish status updated", updated))
}

pub(super) fn routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(get_all_videos))
        .route("/", post(publish_a_video))
        .route("/{videoId}", get(get_video_by_id))
        .route("/{videoId}", patch(update_video))
        .route("/{videoId}", delete(delete_video))
        .route("/{videoId}/toggle-publish", patch(toggle_publish_status))
        .with_state(state)
}
