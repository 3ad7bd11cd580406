//! Tweets: short owner-gated posts.

use super::ensure_object_id;
use super::error::ApiError;
use super::response;
use super::session::Session;
use super::state::ServerState;
use crate::content_store::Tweet;

use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;

const MAX_TWEET_LENGTH: usize = 280;

#[derive(Deserialize, Debug)]
struct ContentBody {
    content: String,
}

fn validated_content(raw: &str) -> Result<&str, ApiError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("Content is required".to_owned()));
    }
    if content.graphemes(true).count() > MAX_TWEET_LENGTH {
        return Err(ApiError::Validation(format!(
            "Content length should not be greater than {MAX_TWEET_LENGTH} characters"
        )));
    }
    Ok(content)
}

async fn create_tweet(
    session: Session,
    State(state): State<ServerState>,
    Json(body): Json<ContentBody>,
) -> Result<Response, ApiError> {
    let content = validated_content(&body.content)?;

    let tweet = Tweet::new(session.user_id(), content.to_owned());
    state.store.create_tweet(&tweet)?;
    Ok(response::created("Tweet created successfully", tweet))
}

async fn get_user_tweets(
    _session: Session,
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    ensure_object_id(&user_id, "userId")?;

    state
        .store
        .get_user(&user_id)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_owned()))?;

    let tweets = state.store.user_tweets(&user_id)?;
    Ok(response::ok("User tweets fetched successfully", tweets))
}

async fn update_tweet(
    session: Session,
    State(state): State<ServerState>,
    Path(tweet_id): Path<String>,
    Json(body): Json<ContentBody>,
) -> Result<Response, ApiError> {
    ensure_object_id(&tweet_id, "tweetId")?;
    let content = validated_content(&body.content)?;

    let tweet = state
        .store
        .get_tweet(&tweet_id)?
        .ok_or_else(|| ApiError::NotFound("Tweet not found".to_owned()))?;
    if tweet.owner_id != session.user_id() {
        return Err(ApiError::Forbidden(
            "You are not the owner of this tweet".to_owned(),
        ));
    }

    state.store.update_tweet_content(&tweet_id, content)?;
    let updated = state
        .store
        .get_tweet(&tweet_id)?
        .ok_or_else(|| ApiError::NotFound("Tweet not found".to_owned()))?;
    Ok(response::ok("Tweet updated successfully", updated))
}

async fn delete_tweet(
    session: Session,
    State(state): State<ServerState>,
    Path(tweet_id): Path<String>,
) -> Result<Response, ApiError> {
    ensure_object_id(&tweet_id, "tweetId")?;

    let tweet = state
        .store
        .get_tweet(&tweet_id)?
        .ok_or_else(|| ApiError::NotFound("Tweet not found".to_owned()))?;
    if tweet.owner_id != session.user_id() {
        return Err(ApiError::Forbidden(
            "You are not the owner of this tweet".to_owned(),
        ));
    }

    state.store.delete_tweet(&tweet_id)?;
    Ok(response::ok("Tweet deleted successfully", tweet))
}

pub(super) fn routes(state: ServerState) -> Router {
    // One path segment, method-dispatched: GET takes a user id,
    // PATCH/DELETE a tweet id.
    Router::new()
        .route("/", post(create_tweet))
        .route(
            "/{id}",
            get(get_user_tweets).patch(update_tweet).delete(delete_tweet),
        )
        .with_state(state)
}
