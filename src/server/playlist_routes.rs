//! Playlists: owner-gated CRUD plus add/remove of videos.

use super::ensure_object_id;
use super::error::ApiError;
use super::response;
use super::session::Session;
use super::state::ServerState;
use crate::content_store::Playlist;

use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
struct CreatePlaylistBody {
    name: String,
    description: String,
}

#[derive(Deserialize, Debug)]
struct UpdatePlaylistBody {
    name: Option<String>,
    description: Option<String>,
}

fn load_owned_playlist(
    state: &ServerState,
    playlist_id: &str,
    session: &Session,
    action: &str,
) -> Result<Playlist, ApiError> {
    let playlist = state
        .store
        .get_playlist(playlist_id)?
        .ok_or_else(|| ApiError::NotFound("Playlist not found".to_owned()))?;
    if playlist.owner_id != session.user_id() {
        return Err(ApiError::Forbidden(format!(
            "You are not allowed to {action} this playlist"
        )));
    }
    Ok(playlist)
}

async fn create_playlist(
    session: Session,
    State(state): State<ServerState>,
    Json(body): Json<CreatePlaylistBody>,
) -> Result<Response, ApiError> {
    let name = body.name.trim();
    let description = body.description.trim();
    if name.is_empty() || description.is_empty() {
        return Err(ApiError::Validation(
            "Name and description are required".to_owned(),
        ));
    }

    let playlist = Playlist::new(session.user_id(), name.to_owned(), description.to_owned());
    state.store.create_playlist(&playlist)?;
    Ok(response::created("Playlist created successfully", playlist))
}

async fn get_user_playlists(
    _session: Session,
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    ensure_object_id(&user_id, "userId")?;

    let playlists = state.store.user_playlists(&user_id)?;
    Ok(response::ok(
        "User playlists fetched successfully",
        playlists,
    ))
}

async fn get_playlist_by_id(
    _session: Session,
    State(state): State<ServerState>,
    Path(playlist_id): Path<String>,
) -> Result<Response, ApiError> {
    ensure_object_id(&playlist_id, "playlistId")?;

    let playlist = state
        .store
        .get_playlist_with_videos(&playlist_id)?
        .ok_or_else(|| ApiError::NotFound("Playlist not found".to_owned()))?;
    Ok(response::ok("Playlist fetched successfully", playlist))
}

async fn update_playlist(
    session: Session,
    State(state): State<ServerState>,
    Path(playlist_id): Path<String>,
    Json(body): Json<UpdatePlaylistBody>,
) -> Result<Response, ApiError> {
    ensure_object_id(&playlist_id, "playlistId")?;
    load_owned_playlist(&state, &playlist_id, &session, "update")?;

    let name = body.name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let description = body
        .description
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if name.is_none() && description.is_none() {
        return Err(ApiError::Validation("Nothing to update".to_owned()));
    }

    state.store.update_playlist(&playlist_id, name, description)?;
    let updated = state
        .store
        .get_playlist(&playlist_id)?
        .ok_or_else(|| ApiError::NotFound("Playlist not found".to_owned()))?;
    Ok(response::ok("Playlist updated successfully", updated))
}

async fn delete_playlist(
    session: Session,
    State(state): State<ServerState>,
    Path(playlist_id): Path<String>,
) -> Result<Response, ApiError> {
    ensure_object_id(&playlist_id, "playlistId")?;
    let playlist = load_owned_playlist(&state, &playlist_id, &session, "delete")?;

    state.store.delete_playlist(&playlist_id)?;
    Ok(response::ok("Playlist deleted successfully", playlist))
}

async fn add_video_to_playlist(
    session: Session,
    State(state): State<ServerState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    ensure_object_id(&video_id, "videoId")?;
    ensure_object_id(&playlist_id, "playlistId")?;
    load_owned_playlist(&state, &playlist_id, &session, "update")?;

    state
        .store
        .get_video(&video_id)?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_owned()))?;

    if !state.store.add_video_to_playlist(&playlist_id, &video_id)? {
        return Err(ApiError::Validation(
            "Video already exists in this playlist".to_owned(),
        ));
    }

    let playlist = state
        .store
        .get_playlist_with_videos(&playlist_id)?
        .ok_or_else(|| ApiError::NotFound("Playlist not found".to_owned()))?;
    Ok(response::ok("Video added to playlist successfully", playlist))
}

async fn remove_video_from_playlist(
    session: Session,
    State(state): State<ServerState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    ensure_object_id(&video_id, "videoId")?;
    ensure_object_id(&playlist_id, "playlistId")?;
    load_owned_playlist(&state, &playlist_id, &session, "update")?;

    state
        .store
        .remove_video_from_playlist(&playlist_id, &video_id)?;

    let playlist = state
        .store
        .get_playlist_with_videos(&playlist_id)?
        .ok_or_else(|| ApiError::NotFound("Playlist not found".to_owned()))?;
    Ok(response::ok(
        "Video removed from playlist successfully",
        playlist,
    ))
}

pub(super) fn routes(state: ServerState) -> Router {
    Router::new()
        .route("/", post(create_playlist))
        .route("/user/{userId}", get(get_user_playlists))
        .route("/{playlistId}", get(get_playlist_by_id))
        .route("/{playlistId}", patch(update_playlist))
        .route("/{playlistId}", delete(delete_playlist))
        .route("/add/{videoId}/{playlistId}", patch(add_video_to_playlist))
        .route(
            "/remove/{videoId}/{playlistId}",
            patch(remove_video_from_playlist),
        )
        .with_state(state)
}
