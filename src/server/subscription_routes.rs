//! Channel subscriptions.

use super::ensure_object_id;
use super::error::ApiError;
use super::response;
use super::session::Session;
use super::state::ServerState;

use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;

async fn toggle_subscription(
    session: Session,
    State(state): State<ServerState>,
    Path(channel_id): Path<String>,
) -> Result<Response, ApiError> {
    ensure_object_id(&channel_id, "channelId")?;

    if channel_id == session.user_id() {
        return Err(ApiError::Validation(
            "You cannot subscribe to yourself".to_owned(),
        ));
    }

    state
        .store
        .get_user(&channel_id)?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_owned()))?;

    match state
        .store
        .toggle_subscription(&channel_id, session.user_id())?
    {
        Some(subscription) => Ok(response::ok("Subscribed successfully", subscription)),
        None => Ok(response::ok(
            "Unsubscribed successfully",
            serde_json::Value::Null,
        )),
    }
}

async fn get_user_channel_subscribers(
    _session: Session,
    State(state): State<ServerState>,
    Path(channel_id): Path<String>,
) -> Result<Response, ApiError> {
    ensure_object_id(&channel_id, "channelId")?;

    let subscribers = state.store.channel_subscribers(&channel_id)?;
    Ok(response::ok("Subscribers fetched successfully", subscribers))
}

async fn get_subscribed_channels(
    _session: Session,
    State(state): State<ServerState>,
    Path(subscriber_id): Path<String>,
) -> Result<Response, ApiError> {
    ensure_object_id(&subscriber_id, "subscriberId")?;

    let channels = state.store.subscribed_channels(&subscriber_id)?;
    Ok(response::ok(
        "Subscribed channels fetched successfully",
        json!({ "total": channels.len(), "channels": channels }),
    ))
}

pub(super) fn routes(state: ServerState) -> Router {
    Router::new()
        .route("/{channelId}", post(toggle_subscription))
        .route("/channel/{channelId}", get(get_user_channel_subscribers))
        .route("/user/{subscriberId}", get(get_subscribed_channels))
        .with_state(state)
}
