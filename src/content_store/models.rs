use serde::Serialize;
use uuid::Uuid;

fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Owner/subscriber/channel projection embedded in responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    #[serde(skip_serializing)]
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub video_file: String,
    pub thumbnail: Option<String>,
    /// Duration in seconds, as reported at upload time.
    pub duration: f64,
    pub views: u64,
    pub is_published: bool,
    #[serde(rename = "createdAt")]
    pub created: i64,
}

impl Video {
    pub fn new(
        owner_id: &str,
        title: String,
        description: String,
        video_file: String,
        thumbnail: Option<String>,
        duration: f64,
    ) -> Self {
        Video {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_owned(),
            title,
            description,
            video_file,
            thumbnail,
            duration,
            views: 0,
            is_published: true,
            created: now_ts(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoWithOwner {
    #[serde(flatten)]
    pub video: Video,
    pub owner: UserSummary,
}

/// Partial update applied to an owned video.
#[derive(Debug, Clone, Default)]
pub struct VideoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_file: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,
}

impl VideoUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.video_file.is_none()
            && self.thumbnail.is_none()
            && self.duration.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSortField {
    Created,
    Views,
    Title,
}

impl VideoSortField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "createdAt" | "created" => Some(VideoSortField::Created),
            "views" => Some(VideoSortField::Views),
            "title" => Some(VideoSortField::Title),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            VideoSortField::Created => "created",
            VideoSortField::Views => "views",
            VideoSortField::Title => "title",
        }
    }
}

/// Listing filter for the video collection.
#[derive(Debug, Clone)]
pub struct VideoQuery {
    pub page: u32,
    pub limit: u32,
    pub text: Option<String>,
    pub owner_id: Option<String>,
    /// Set when the requester is the owner being filtered on.
    pub include_unpublished: bool,
    pub sort_by: VideoSortField,
    pub ascending: bool,
}

impl Default for VideoQuery {
    fn default() -> Self {
        VideoQuery {
            page: 1,
            limit: 10,
            text: None,
            owner_id: None,
            include_unpublished: false,
            sort_by: VideoSortField::Created,
            ascending: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    #[serde(rename = "video")]
    pub video_id: String,
    #[serde(skip_serializing)]
    pub owner_id: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created: i64,
}

impl Comment {
    pub fn new(video_id: &str, owner_id: &str, content: String) -> Self {
        Comment {
            id: Uuid::new_v4().to_string(),
            video_id: video_id.to_owned(),
            owner_id: owner_id.to_owned(),
            content,
            created: now_ts(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentWithOwner {
    #[serde(flatten)]
    pub comment: Comment,
    pub owner: UserSummary,
}

/// The one thing a like can point at. Exactly one of the three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeTarget {
    Video(String),
    Comment(String),
    Tweet(String),
}

impl LikeTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            LikeTarget::Video(_) => "video",
            LikeTarget::Comment(_) => "comment",
            LikeTarget::Tweet(_) => "tweet",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            LikeTarget::Video(id) | LikeTarget::Comment(id) | LikeTarget::Tweet(id) => id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: String,
    #[serde(rename = "owner")]
    pub owner_id: String,
    pub target_type: String,
    pub target_id: String,
    #[serde(rename = "createdAt")]
    pub created: i64,
}

impl Like {
    pub fn new(owner_id: &str, target: &LikeTarget) -> Self {
        Like {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_owned(),
            target_type: target.kind().to_owned(),
            target_id: target.id().to_owned(),
            created: now_ts(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    #[serde(rename = "channel")]
    pub channel_id: String,
    #[serde(rename = "subscriber")]
    pub subscriber_id: String,
    #[serde(rename = "createdAt")]
    pub created: i64,
}

impl Subscription {
    pub fn new(channel_id: &str, subscriber_id: &str) -> Self {
        Subscription {
            id: Uuid::new_v4().to_string(),
            channel_id: channel_id.to_owned(),
            subscriber_id: subscriber_id.to_owned(),
            created: now_ts(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    #[serde(rename = "owner")]
    pub owner_id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "createdAt")]
    pub created: i64,
}

impl Playlist {
    pub fn new(owner_id: &str, name: String, description: String) -> Self {
        Playlist {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_owned(),
            name,
            description,
            created: now_ts(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistWithVideos {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub videos: Vec<VideoWithOwner>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: String,
    #[serde(rename = "owner")]
    pub owner_id: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created: i64,
}

impl Tweet {
    pub fn new(owner_id: &str, content: String) -> Self {
        Tweet {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_owned(),
            content,
            created: now_ts(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub total_videos: u64,
    pub total_views: u64,
    pub total_likes: u64,
    pub total_subscribers: u64,
}

/// Offset/limit pagination envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub total_docs: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
}

impl<T> Page<T> {
    pub fn new(docs: Vec<T>, total_docs: u64, page: u32, limit: u32) -> Self {
        let total_pages = std::cmp::max(1, total_docs.div_ceil(limit.max(1) as u64) as u32);
        let has_next_page = page < total_pages;
        let has_prev_page = page > 1;
        Page {
            docs,
            total_docs,
            page,
            limit,
            total_pages,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then_some(page + 1),
            prev_page: has_prev_page.then(|| page - 1),
        }
    }
}
