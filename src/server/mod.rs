pub mod config;
mod error;
mod http_layers;
mod multipart;
mod response;
pub mod server;
pub(crate) mod session;
pub mod state;

mod comment_routes;
mod dashboard_routes;
mod like_routes;
mod playlist_routes;
mod subscription_routes;
mod tweet_routes;
mod user_routes;
mod video_routes;

pub use config::ServerConfig;
pub use error::ApiError;
pub use http_layers::RequestsLoggingLevel;
pub use server::{make_app, run_server};

use uuid::Uuid;

/// Entity ids are uuids; anything else is rejected before touching the store.
pub(crate) fn ensure_object_id(id: &str, what: &str) -> Result<(), ApiError> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| ApiError::Validation(format!("Invalid {what}")))
}
