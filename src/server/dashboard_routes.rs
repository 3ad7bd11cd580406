//! Channel dashboard for the authenticated owner.

use super::error::ApiError;
use super::response;
use super::session::Session;
use super::state::ServerState;

use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde_json::json;

async fn get_channel_stats(
    session: Session,
    State(state): State<ServerState>,
) -> Result<Response, ApiError> {
    let stats = state.store.channel_stats(session.user_id())?;
    Ok(response::ok("Channel stats fetched successfully", stats))
}

async fn get_channel_videos(
    session: Session,
    State(state): State<ServerState>,
) -> Result<Response, ApiError> {
    let (videos, total) = state.store.channel_videos(session.user_id())?;
    Ok(response::ok(
        "Channel videos fetched successfully",
        json!({ "videos": videos, "total": total }),
    ))
}

pub(super) fn routes(state: ServerState) -> Router {
    Router::new()
        .route("/stats", get(get_channel_stats))
        .route("/videos", get(get_channel_videos))
        .with_state(state)
}
