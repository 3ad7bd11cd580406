use serde::{Deserialize, Serialize};

/// Full user record as stored, secrets included. Never serialized directly;
/// responses go through [`PublicUser`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    /// The single currently-valid refresh token, if any.
    pub refresh_token: Option<String>,
    pub created: i64,
}

/// Projection of a user without password hash and refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub created_at: i64,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            avatar: user.avatar_url,
            cover_image: user.cover_image_url,
            created_at: user.created,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Channel page for a user, with subscription aggregates relative to the
/// requesting viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    #[serde(flatten)]
    pub user: PublicUser,
    pub subscribers_count: u64,
    pub channels_subscribed_to_count: u64,
    pub is_subscribed: bool,
}
