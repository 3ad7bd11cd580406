//! End-to-end tests for playlists.

mod common;

use common::{body_json, TestClient, TestServer, OTHER_PASS, OTHER_USER, TEST_PASS, TEST_USER};
use reqwest::StatusCode;

async fn setup_video(client: &TestClient, title: &str) -> String {
    let response = client.publish_video(title).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["data"]["id"].as_str().unwrap().to_owned()
}

async fn setup_playlist(client: &TestClient, name: &str) -> String {
    let response = client.create_playlist(name, "a playlist").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["data"]["id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn create_requires_name_and_description() {
    let server = TestServer::spawn().await;
    let alice = TestClient::authenticated(server.base_url.clone(), TEST_USER, TEST_PASS).await;

    let response = alice.create_playlist("", "description").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let response = alice.create_playlist("name", "").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_and_remove_videos() {
    let server = TestServer::spawn().await;
    let alice = TestClient::authenticated(server.base_url.clone(), TEST_USER, TEST_PASS).await;

    let video_id = setup_video(&alice, "a clip").await;
    let playlist_id = setup_playlist(&alice, "mix").await;

    let response = alice.add_video_to_playlist(&video_id, &playlist_id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["videos"].as_array().unwrap().len(), 1);

    // Duplicates are rejected by explicit check.
    let response = alice.add_video_to_playlist(&video_id, &playlist_id).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = alice
        .remove_video_from_playlist(&video_id, &playlist_id)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["videos"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn playlist_detail_lists_videos_in_order() {
    let server = TestServer::spawn().await;
    let alice = TestClient::authenticated(server.base_url.clone(), TEST_USER, TEST_PASS).await;

    let first = setup_video(&alice, "first").await;
    let second = setup_video(&alice, "second").await;
    let playlist_id = setup_playlist(&alice, "mix").await;

    alice.add_video_to_playlist(&first, &playlist_id).await;
    alice.add_video_to_playlist(&second, &playlist_id).await;

    let body = body_json(alice.get_playlist(&playlist_id).await).await;
    let videos = body["data"]["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0]["id"], *first);
    assert_eq!(videos[1]["id"], *second);
}

#[tokio::test]
async fn only_the_owner_can_mutate() {
    let server = TestServer::spawn().await;
    let alice = TestClient::authenticated(server.base_url.clone(), TEST_USER, TEST_PASS).await;
    let bob = TestClient::authenticated(server.base_url.clone(), OTHER_USER, OTHER_PASS).await;

    let video_id = setup_video(&alice, "a clip").await;
    let playlist_id = setup_playlist(&alice, "mix").await;

    let response = bob.update_playlist(&playlist_id, "hijacked").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = bob.delete_playlist(&playlist_id).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = bob.add_video_to_playlist(&video_id, &playlist_id).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Reads are open to any authenticated user.
    let response = bob.get_playlist(&playlist_id).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn owner_update_and_delete() {
    let server = TestServer::spawn().await;
    let alice = TestClient::authenticated(server.base_url.clone(), TEST_USER, TEST_PASS).await;

    let playlist_id = setup_playlist(&alice, "mix").await;

    let response = alice.update_playlist(&playlist_id, "renamed").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "renamed");

    let response = alice.delete_playlist(&playlist_id).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = alice.get_playlist(&playlist_id).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_playlists_are_listed() {
    let server = TestServer::spawn().await;
    let alice = TestClient::authenticated(server.base_url.clone(), TEST_USER, TEST_PASS).await;

    setup_playlist(&alice, "one").await;
    setup_playlist(&alice, "two").await;

    let body = body_json(alice.current_user().await).await;
    let alice_id = body["data"]["id"].as_str().unwrap().to_owned();

    let body = body_json(alice.user_playlists(&alice_id).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}
