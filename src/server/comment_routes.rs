//! Comments on videos.

use super::ensure_object_id;
use super::error::ApiError;
use super::response;
use super::session::Session;
use super::state::ServerState;
use crate::content_store::Comment;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
struct PageParams {
    page: Option<u32>,
    limit: Option<u32>,
}

#[derive(Deserialize, Debug)]
struct ContentBody {
    content: String,
}

async fn get_video_comments(
    State(state): State<ServerState>,
    Path(video_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    ensure_object_id(&video_id, "videoId")?;

    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(15).clamp(1, 100);
    let comments = state.store.comments_for_video(&video_id, page, limit)?;

    let message = if comments.total_docs == 0 {
        "No comments found"
    } else {
        "Comments fetched successfully"
    };
    Ok(response::ok(message, comments))
}

async fn add_comment(
    session: Session,
    State(state): State<ServerState>,
    Path(video_id): Path<String>,
    Json(body): Json<ContentBody>,
) -> Result<Response, ApiError> {
    ensure_object_id(&video_id, "videoId")?;

    let content = body.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("Content is required".to_owned()));
    }

    state
        .store
        .get_video(&video_id)?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_owned()))?;

    let comment = Comment::new(&video_id, session.user_id(), content.to_owned());
    state.store.create_comment(&comment)?;

    let created = state
        .store
        .get_comment_with_owner(&comment.id)?
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("Created comment not found")))?;
    Ok(response::created("Comment added successfully", created))
}

async fn update_comment(
    session: Session,
    State(state): State<ServerState>,
    Path(comment_id): Path<String>,
    Json(body): Json<ContentBody>,
) -> Result<Response, ApiError> {
    ensure_object_id(&comment_id, "commentId")?;

    let content = body.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("Content is required".to_owned()));
    }

    let comment = state
        .store
        .get_comment(&comment_id)?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_owned()))?;
    if comment.owner_id != session.user_id() {
        return Err(ApiError::Forbidden(
            "You are not the owner of this comment".to_owned(),
        ));
    }

    state.store.update_comment_content(&comment_id, content)?;
    let updated = state
        .store
        .get_comment_with_owner(&comment_id)?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_owned()))?;
    Ok(response::ok("Comment updated successfully", updated))
}

async fn delete_comment(
    session: Session,
    State(state): State<ServerState>,
    Path(comment_id): Path<String>,
) -> Result<Response, ApiError> {
    ensure_object_id(&comment_id, "commentId")?;

    let comment = state
        .store
        .get_comment(&comment_id)?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_owned()))?;
    if comment.owner_id != session.user_id() {
        return Err(ApiError::Forbidden(
            "You are not the owner of this comment".to_owned(),
        ));
    }

    state.store.delete_comment(&comment_id)?;
    Ok(response::ok("Comment deleted successfully", comment))
}

pub(super) fn routes(state: ServerState) -> Router {
    // One path segment, method-dispatched: GET/POST take a video id,
    // PATCH/DELETE a comment id.
    Router::new()
        .route(
            "/{id}",
            get(get_video_comments)
                .post(add_comment)
                .patch(update_comment)
                .delete(delete_comment),
        )
        .with_state(state)
}
