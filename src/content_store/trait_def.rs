use super::models::{
    ChannelStats, Comment, CommentWithOwner, Like, LikeTarget, Page, Playlist, PlaylistWithVideos,
    Subscription, Tweet, UserSummary, Video, VideoQuery, VideoUpdate, VideoWithOwner,
};
use anyhow::Result;

pub trait ContentStore: Send + Sync {
    // ------------------------------------------------------------------
    // Videos
    // ------------------------------------------------------------------

    fn create_video(&self, video: &Video) -> Result<()>;

    /// Returns Ok(None) if the video does not exist.
    fn get_video(&self, video_id: &str) -> Result<Option<Video>>;

    fn get_video_with_owner(&self, video_id: &str) -> Result<Option<VideoWithOwner>>;

    /// Published videos matching the query; owners filtering on themselves
    /// also see unpublished ones.
    fn list_videos(&self, query: &VideoQuery) -> Result<Page<VideoWithOwner>>;

    /// Applies a partial update and returns the updated record.
    /// Returns Ok(None) if the video does not exist.
    fn update_video(&self, video_id: &str, update: &VideoUpdate) -> Result<Option<Video>>;

    /// Deletes the video together with its comments, the likes of video and
    /// comments, playlist memberships and watch history entries, atomically.
    fn delete_video(&self, video_id: &str) -> Result<()>;

    fn set_video_published(&self, video_id: &str, is_published: bool) -> Result<()>;

    fn increment_views(&self, video_id: &str) -> Result<()>;

    /// Records a playback in the viewer's watch history (idempotent per
    /// viewer/video pair, refreshes the watch timestamp).
    fn record_watch(&self, user_id: &str, video_id: &str) -> Result<()>;

    /// Most recently watched first.
    fn watch_history(&self, user_id: &str) -> Result<Vec<VideoWithOwner>>;

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    fn create_comment(&self, comment: &Comment) -> Result<()>;

    fn get_comment(&self, comment_id: &str) -> Result<Option<Comment>>;

    fn get_comment_with_owner(&self, comment_id: &str) -> Result<Option<CommentWithOwner>>;

    /// Newest first.
    fn comments_for_video(
        &self,
        video_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Page<CommentWithOwner>>;

    fn update_comment_content(&self, comment_id: &str, content: &str) -> Result<()>;

    /// Deletes the comment and the likes referencing it, atomically.
    fn delete_comment(&self, comment_id: &str) -> Result<()>;

    // ------------------------------------------------------------------
    // Likes
    // ------------------------------------------------------------------

    /// Creates the like if absent, removes it if present. Returns the new
    /// like when the toggle switched it on, None when it switched it off.
    /// A concurrent duplicate insert resolves through the unique constraint
    /// and is reported as toggled-on.
    fn toggle_like(&self, owner_id: &str, target: &LikeTarget) -> Result<Option<Like>>;

    fn liked_videos(&self, owner_id: &str) -> Result<Vec<VideoWithOwner>>;

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Toggle semantics as for likes.
    fn toggle_subscription(
        &self,
        channel_id: &str,
        subscriber_id: &str,
    ) -> Result<Option<Subscription>>;

    fn channel_subscribers(&self, channel_id: &str) -> Result<Vec<UserSummary>>;

    fn subscribed_channels(&self, subscriber_id: &str) -> Result<Vec<UserSummary>>;

    // ------------------------------------------------------------------
    // Playlists
    // ------------------------------------------------------------------

    fn create_playlist(&self, playlist: &Playlist) -> Result<()>;

    fn get_playlist(&self, playlist_id: &str) -> Result<Option<Playlist>>;

    /// Playlist plus its videos in insertion order.
    fn get_playlist_with_videos(&self, playlist_id: &str) -> Result<Option<PlaylistWithVideos>>;

    fn user_playlists(&self, user_id: &str) -> Result<Vec<Playlist>>;

    fn update_playlist(
        &self,
        playlist_id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<()>;

    fn delete_playlist(&self, playlist_id: &str) -> Result<()>;

    /// Returns false when the video is already in the playlist.
    fn add_video_to_playlist(&self, playlist_id: &str, video_id: &str) -> Result<bool>;

    fn remove_video_from_playlist(&self, playlist_id: &str, video_id: &str) -> Result<()>;

    // ------------------------------------------------------------------
    // Tweets
    // ------------------------------------------------------------------

    fn create_tweet(&self, tweet: &Tweet) -> Result<()>;

    fn get_tweet(&self, tweet_id: &str) -> Result<Option<Tweet>>;

    /// Newest first.
    fn user_tweets(&self, user_id: &str) -> Result<Vec<Tweet>>;

    fn update_tweet_content(&self, tweet_id: &str, content: &str) -> Result<()>;

    /// Deletes the tweet and the likes referencing it, atomically.
    fn delete_tweet(&self, tweet_id: &str) -> Result<()>;

    // ------------------------------------------------------------------
    // Dashboard
    // ------------------------------------------------------------------

    fn channel_stats(&self, channel_id: &str) -> Result<ChannelStats>;

    /// All of the channel's videos, published or not, with the total count.
    fn channel_videos(&self, channel_id: &str) -> Result<(Vec<VideoWithOwner>, u64)>;
}
