use super::RequestsLoggingLevel;
use std::path::PathBuf;

#[derive(Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Allowed CORS origin; no CORS layer is installed when unset.
    pub cors_origin: Option<String>,
    /// Directory uploaded media is written to and served from under /media.
    pub media_dir: PathBuf,
    pub requests_logging_level: RequestsLoggingLevel,
    /// Auth cookies carry the Secure attribute. Disable only when serving
    /// plain http, e.g. local development and tests.
    pub secure_cookies: bool,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub access_token_expiry_minutes: i64,
    pub refresh_token_expiry_days: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: 8080,
            cors_origin: None,
            media_dir: PathBuf::from("media"),
            requests_logging_level: RequestsLoggingLevel::Path,
            secure_cookies: true,
            access_token_secret: "dev-access-secret".to_owned(),
            refresh_token_secret: "dev-refresh-secret".to_owned(),
            access_token_expiry_minutes: 60,
            refresh_token_expiry_days: 10,
        }
    }
}
