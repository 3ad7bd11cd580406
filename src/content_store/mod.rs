pub mod models;
mod trait_def;

pub use models::{
    ChannelStats, Comment, CommentWithOwner, Like, LikeTarget, Page, Playlist, PlaylistWithVideos,
    Subscription, Tweet, UserSummary, Video, VideoQuery, VideoSortField, VideoUpdate,
    VideoWithOwner,
};
pub use trait_def::ContentStore;
