//! Like toggles for videos, comments and tweets.

use super::ensure_object_id;
use super::error::ApiError;
use super::response;
use super::session::Session;
use super::state::ServerState;
use crate::content_store::LikeTarget;

use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;

/// Shared toggle shape: the actor is always the owner of the join record, so
/// there is no separate authorization step.
fn toggle(
    state: &ServerState,
    session: &Session,
    target: LikeTarget,
    liked_message: &str,
    unliked_message: &str,
) -> Result<Response, ApiError> {
    match state.store.toggle_like(session.user_id(), &target)? {
        Some(like) => Ok(response::ok(liked_message, like)),
        None => Ok(response::ok(unliked_message, serde_json::Value::Null)),
    }
}

async fn toggle_video_like(
    session: Session,
    State(state): State<ServerState>,
    Path(video_id): Path<String>,
) -> Result<Response, ApiError> {
    ensure_object_id(&video_id, "videoId")?;
    state
        .store
        .get_video(&video_id)?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_owned()))?;

    toggle(
        &state,
        &session,
        LikeTarget::Video(video_id),
        "Video liked",
        "Video unliked",
    )
}

async fn toggle_comment_like(
    session: Session,
    State(state): State<ServerState>,
    Path(comment_id): Path<String>,
) -> Result<Response, ApiError> {
    ensure_object_id(&comment_id, "commentId")?;
    state
        .store
        .get_comment(&comment_id)?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_owned()))?;

    toggle(
        &state,
        &session,
        LikeTarget::Comment(comment_id),
        "Comment liked",
        "Comment unliked",
    )
}

async fn toggle_tweet_like(
    session: Session,
    State(state): State<ServerState>,
    Path(tweet_id): Path<String>,
) -> Result<Response, ApiError> {
    ensure_object_id(&tweet_id, "tweetId")?;
    state
        .store
        .get_tweet(&tweet_id)?
        .ok_or_else(|| ApiError::NotFound("Tweet not found".to_owned()))?;

    toggle(
        &state,
        &session,
        LikeTarget::Tweet(tweet_id),
        "Tweet liked",
        "Tweet unliked",
    )
}

async fn get_liked_videos(
    session: Session,
    State(state): State<ServerState>,
) -> Result<Response, ApiError> {
    let videos = state.store.liked_videos(session.user_id())?;
    Ok(response::ok("Liked videos fetched successfully", videos))
}

pub(super) fn routes(state: ServerState) -> Router {
    Router::new()
        .route("/video/{videoId}", post(toggle_video_like))
        .route("/comment/{commentId}", post(toggle_comment_like))
        .route("/tweet/{tweetId}", post(toggle_tweet_like))
        .route("/videos", get(get_liked_videos))
        .with_state(state)
}
