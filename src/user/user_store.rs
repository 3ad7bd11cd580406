use super::user_models::{AccountUpdate, ChannelProfile, NewUser, User};
use anyhow::Result;

pub trait UserStore: Send + Sync {
    /// Creates a new user and returns the stored record.
    /// Returns Err on a duplicate username or email.
    fn create_user(&self, user: &NewUser) -> Result<User>;

    /// Returns a user by id.
    /// Returns Ok(None) if the user does not exist.
    fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Returns a user whose username or email equals the given handle.
    fn get_user_by_handle(&self, handle: &str) -> Result<Option<User>>;

    /// Returns true if the username or the email is already taken.
    fn username_or_email_exists(&self, username: &str, email: &str) -> Result<bool>;

    /// Overwrites the stored refresh token; None clears it.
    fn set_refresh_token(&self, user_id: &str, refresh_token: Option<&str>) -> Result<()>;

    /// Replaces the password hash. Nothing else is touched.
    fn set_password_hash(&self, user_id: &str, password_hash: &str) -> Result<()>;

    /// Applies a partial account update and returns the updated record.
    /// Returns Ok(None) if the user does not exist.
    fn update_account(&self, user_id: &str, update: &AccountUpdate) -> Result<Option<User>>;

    fn set_avatar(&self, user_id: &str, avatar_url: &str) -> Result<Option<User>>;

    fn set_cover_image(&self, user_id: &str, cover_image_url: &str) -> Result<Option<User>>;

    /// Channel page by username, with subscriber aggregates computed relative
    /// to the viewer (if any).
    fn channel_profile(
        &self,
        username: &str,
        viewer_id: Option<&str>,
    ) -> Result<Option<ChannelProfile>>;
}
