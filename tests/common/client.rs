//! HTTP client for end-to-end tests.
//!
//! Wraps reqwest with cookie-based session handling and one method per
//! endpoint. When routes or request formats change, update only this file.

use super::constants::*;
use super::fixtures;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

/// HTTP test client with cookie-based session management.
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    /// Creates a new unauthenticated client.
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Registers a fresh user and logs in; the returned client is ready to
    /// make authenticated requests.
    ///
    /// # Panics
    ///
    /// Panics if registration or login fails (test infrastructure problem).
    pub async fn authenticated(base_url: String, username: &str, password: &str) -> Self {
        let client = Self::new(base_url);

        let response = client.register(username, password).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::CREATED,
            "Registration failed: {:?}",
            response.text().await
        );

        let response = client.login(username, password).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "Login failed: {:?}",
            response.text().await
        );

        client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// POST /users/register with avatar attached.
    pub async fn register(&self, username: &str, password: &str) -> Response {
        let form = Form::new()
            .text("fullName", format!("The {username}"))
            .text("email", format!("{username}@x.com"))
            .text("username", username.to_owned())
            .text("password", password.to_owned())
            .part(
                "avatar",
                Part::bytes(fixtures::png_bytes())
                    .file_name("avatar.png")
                    .mime_str("image/png")
                    .unwrap(),
            );
        self.client
            .post(self.url("/users/register"))
            .multipart(form)
            .send()
            .await
            .expect("Register request failed")
    }

    /// POST /users/register without the avatar file.
    pub async fn register_without_avatar(&self, username: &str, password: &str) -> Response {
        let form = Form::new()
            .text("fullName", format!("The {username}"))
            .text("email", format!("{username}@x.com"))
            .text("username", username.to_owned())
            .text("password", password.to_owned());
        self.client
            .post(self.url("/users/register"))
            .multipart(form)
            .send()
            .await
            .expect("Register request failed")
    }

    /// POST /users/login
    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.client
            .post(self.url("/users/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Login request failed")
    }

    /// POST /users/logout
    pub async fn logout(&self) -> Response {
        self.client
            .post(self.url("/users/logout"))
            .send()
            .await
            .expect("Logout request failed")
    }

    /// POST /users/refresh-token with a JSON body (no cookie involved).
    pub async fn refresh_with_body(&self, refresh_token: &str) -> Response {
        self.client
            .post(self.url("/users/refresh-token"))
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await
            .expect("Refresh request failed")
    }

    /// POST /users/change-password
    pub async fn change_password(&self, old_password: &str, new_password: &str) -> Response {
        self.client
            .post(self.url("/users/change-password"))
            .json(&json!({ "oldPassword": old_password, "newPassword": new_password }))
            .send()
            .await
            .expect("Change password request failed")
    }

    /// GET /users/current
    pub async fn current_user(&self) -> Response {
        self.client
            .get(self.url("/users/current"))
            .send()
            .await
            .expect("Current user request failed")
    }

    /// GET /users/current with a bearer token instead of cookies.
    pub async fn current_user_with_bearer(&self, token: &str) -> Response {
        self.client
            .get(self.url("/users/current"))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Current user request failed")
    }

    /// PATCH /users/update-account
    pub async fn update_account(&self, body: serde_json::Value) -> Response {
        self.client
            .patch(self.url("/users/update-account"))
            .json(&body)
            .send()
            .await
            .expect("Update account request failed")
    }

    /// PATCH /users/avatar
    pub async fn update_avatar(&self) -> Response {
        let form = Form::new().part(
            "avatar",
            Part::bytes(fixtures::png_bytes())
                .file_name("avatar.png")
                .mime_str("image/png")
                .unwrap(),
        );
        self.client
            .patch(self.url("/users/avatar"))
            .multipart(form)
            .send()
            .await
            .expect("Update avatar request failed")
    }

    /// GET /users/channel/{username}
    pub async fn channel_profile(&self, username: &str) -> Response {
        self.client
            .get(self.url(&format!("/users/channel/{username}")))
            .send()
            .await
            .expect("Channel profile request failed")
    }

    /// GET /users/watch-history
    pub async fn watch_history(&self) -> Response {
        self.client
            .get(self.url("/users/watch-history"))
            .send()
            .await
            .expect("Watch history request failed")
    }

    // ========================================================================
    // Videos
    // ========================================================================

    /// POST /videos with video file, thumbnail and duration attached.
    pub async fn publish_video(&self, title: &str) -> Response {
        let form = Form::new()
            .text("title", title.to_owned())
            .text("description", format!("Description of {title}"))
            .text("duration", "42.5")
            .part(
                "videoFile",
                Part::bytes(fixtures::mp4_bytes())
                    .file_name("clip.mp4")
                    .mime_str("video/mp4")
                    .unwrap(),
            )
            .part(
                "thumbnail",
                Part::bytes(fixtures::png_bytes())
                    .file_name("thumb.png")
                    .mime_str("image/png")
                    .unwrap(),
            );
        self.client
            .post(self.url("/videos"))
            .multipart(form)
            .send()
            .await
            .expect("Publish video request failed")
    }

    /// POST /videos without a video file.
    pub async fn publish_video_without_file(&self, title: &str) -> Response {
        let form = Form::new().text("title", title.to_owned());
        self.client
            .post(self.url("/videos"))
            .multipart(form)
            .send()
            .await
            .expect("Publish video request failed")
    }

    /// GET /videos
    pub async fn list_videos(&self) -> Response {
        self.list_videos_with("").await
    }

    /// GET /videos?{query}
    pub async fn list_videos_with(&self, query: &str) -> Response {
        let url = if query.is_empty() {
            self.url("/videos")
        } else {
            self.url(&format!("/videos?{query}"))
        };
        self.client
            .get(url)
            .send()
            .await
            .expect("List videos request failed")
    }

    /// GET /videos/{id}
    pub async fn get_video(&self, video_id: &str) -> Response {
        self.client
            .get(self.url(&format!("/videos/{video_id}")))
            .send()
            .await
            .expect("Get video request failed")
    }

    /// PATCH /videos/{id} changing only the title.
    pub async fn update_video_title(&self, video_id: &str, title: &str) -> Response {
        let form = Form::new().text("title", title.to_owned());
        self.client
            .patch(self.url(&format!("/videos/{video_id}")))
            .multipart(form)
            .send()
            .await
            .expect("Update video request failed")
    }

    /// DELETE /videos/{id}
    pub async fn delete_video(&self, video_id: &str) -> Response {
        self.client
            .delete(self.url(&format!("/videos/{video_id}")))
            .send()
            .await
            .expect("Delete video request failed")
    }

    /// PATCH /videos/{id}/toggle-publish
    pub async fn toggle_publish(&self, video_id: &str) -> Response {
        self.client
            .patch(self.url(&format!("/videos/{video_id}/toggle-publish")))
            .send()
            .await
            .expect("Toggle publish request failed")
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// GET /comments/{videoId}
    pub async fn comments(&self, video_id: &str) -> Response {
        self.client
            .get(self.url(&format!("/comments/{video_id}")))
            .send()
            .await
            .expect("Comments request failed")
    }

    /// POST /comments/{videoId}
    pub async fn add_comment(&self, video_id: &str, content: &str) -> Response {
        self.client
            .post(self.url(&format!("/comments/{video_id}")))
            .json(&json!({ "content": content }))
            .send()
            .await
            .expect("Add comment request failed")
    }

    /// PATCH /comments/{commentId}
    pub async fn update_comment(&self, comment_id: &str, content: &str) -> Response {
        self.client
            .patch(self.url(&format!("/comments/{comment_id}")))
            .json(&json!({ "content": content }))
            .send()
            .await
            .expect("Update comment request failed")
    }

    /// DELETE /comments/{commentId}
    pub async fn delete_comment(&self, comment_id: &str) -> Response {
        self.client
            .delete(self.url(&format!("/comments/{comment_id}")))
            .send()
            .await
            .expect("Delete comment request failed")
    }

    // ========================================================================
    // Likes
    // ========================================================================

    /// POST /likes/video/{videoId}
    pub async fn toggle_video_like(&self, video_id: &str) -> Response {
        self.client
            .post(self.url(&format!("/likes/video/{video_id}")))
            .send()
            .await
            .expect("Toggle video like request failed")
    }

    /// POST /likes/comment/{commentId}
    pub async fn toggle_comment_like(&self, comment_id: &str) -> Response {
        self.client
            .post(self.url(&format!("/likes/comment/{comment_id}")))
            .send()
            .await
            .expect("Toggle comment like request failed")
    }

    /// POST /likes/tweet/{tweetId}
    pub async fn toggle_tweet_like(&self, tweet_id: &str) -> Response {
        self.client
            .post(self.url(&format!("/likes/tweet/{tweet_id}")))
            .send()
            .await
            .expect("Toggle tweet like request failed")
    }

    /// GET /likes/videos
    pub async fn liked_videos(&self) -> Response {
        self.client
            .get(self.url("/likes/videos"))
            .send()
            .await
            .expect("Liked videos request failed")
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// POST /subscriptions/{channelId}
    pub async fn toggle_subscription(&self, channel_id: &str) -> Response {
        self.client
            .post(self.url(&format!("/subscriptions/{channel_id}")))
            .send()
            .await
            .expect("Toggle subscription request failed")
    }

    /// GET /subscriptions/channel/{channelId}
    pub async fn channel_subscribers(&self, channel_id: &str) -> Response {
        self.client
            .get(self.url(&format!("/subscriptions/channel/{channel_id}")))
            .send()
            .await
            .expect("Channel subscribers request failed")
    }

    /// GET /subscriptions/user/{subscriberId}
    pub async fn subscribed_channels(&self, subscriber_id: &str) -> Response {
        self.client
            .get(self.url(&format!("/subscriptions/user/{subscriber_id}")))
            .send()
            .await
            .expect("Subscribed channels request failed")
    }

    // ========================================================================
    // Playlists
    // ========================================================================

    /// POST /playlists
    pub async fn create_playlist(&self, name: &str, description: &str) -> Response {
        self.client
            .post(self.url("/playlists"))
            .json(&json!({ "name": name, "description": description }))
            .send()
            .await
            .expect("Create playlist request failed")
    }

    /// GET /playlists/{id}
    pub async fn get_playlist(&self, playlist_id: &str) -> Response {
        self.client
            .get(self.url(&format!("/playlists/{playlist_id}")))
            .send()
            .await
            .expect("Get playlist request failed")
    }

    /// GET /playlists/user/{userId}
    pub async fn user_playlists(&self, user_id: &str) -> Response {
        self.client
            .get(self.url(&format!("/playlists/user/{user_id}")))
            .send()
            .await
            .expect("User playlists request failed")
    }

    /// PATCH /playlists/{id}
    pub async fn update_playlist(&self, playlist_id: &str, name: &str) -> Response {
        self.client
            .patch(self.url(&format!("/playlists/{playlist_id}")))
            .json(&json!({ "name": name }))
            .send()
            .await
            .expect("Update playlist request failed")
    }

    /// DELETE /playlists/{id}
    pub async fn delete_playlist(&self, playlist_id: &str) -> Response {
        self.client
            .delete(self.url(&format!("/playlists/{playlist_id}")))
            .send()
            .await
            .expect("Delete playlist request failed")
    }

    /// PATCH /playlists/add/{videoId}/{playlistId}
    pub async fn add_video_to_playlist(&self, video_id: &str, playlist_id: &str) -> Response {
        self.client
            .patch(self.url(&format!("/playlists/add/{video_id}/{playlist_id}")))
            .send()
            .await
            .expect("Add video to playlist request failed")
    }

    /// PATCH /playlists/remove/{videoId}/{playlistId}
    pub async fn remove_video_from_playlist(&self, video_id: &str, playlist_id: &str) -> Response {
        self.client
            .patch(self.url(&format!("/playlists/remove/{video_id}/{playlist_id}")))
            .send()
            .await
            .expect("Remove video from playlist request failed")
    }

    // ========================================================================
    // Tweets
    // ========================================================================

    /// POST /tweets
    pub async fn create_tweet(&self, content: &str) -> Response {
        self.client
            .post(self.url("/tweets"))
            .json(&json!({ "content": content }))
            .send()
            .await
            .expect("Create tweet request failed")
    }

    /// GET /tweets/{userId}
    pub async fn user_tweets(&self, user_id: &str) -> Response {
        self.client
            .get(self.url(&format!("/tweets/{user_id}")))
            .send()
            .await
            .expect("User tweets request failed")
    }

    /// PATCH /tweets/{tweetId}
    pub async fn update_tweet(&self, tweet_id: &str, content: &str) -> Response {
        self.client
            .patch(self.url(&format!("/tweets/{tweet_id}")))
            .json(&json!({ "content": content }))
            .send()
            .await
            .expect("Update tweet request failed")
    }

    /// DELETE /tweets/{tweetId}
    pub async fn delete_tweet(&self, tweet_id: &str) -> Response {
        self.client
            .delete(self.url(&format!("/tweets/{tweet_id}")))
            .send()
            .await
            .expect("Delete tweet request failed")
    }

    // ========================================================================
    // Dashboard
    // ========================================================================

    /// GET /dashboard/stats
    pub async fn dashboard_stats(&self) -> Response {
        self.client
            .get(self.url("/dashboard/stats"))
            .send()
            .await
            .expect("Dashboard stats request failed")
    }

    /// GET /dashboard/videos
    pub async fn dashboard_videos(&self) -> Response {
        self.client
            .get(self.url("/dashboard/videos"))
            .send()
            .await
            .expect("Dashboard videos request failed")
    }
}
