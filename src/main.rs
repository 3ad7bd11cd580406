use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cliptube_server::media_store::LocalMediaStore;
use cliptube_server::{run_server, AppStore, RequestsLoggingLevel, ServerConfig, SqliteStore};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,

    /// Directory uploaded media is stored in and served from.
    #[clap(long, default_value = "media", env = "MEDIA_DIR")]
    pub media_dir: PathBuf,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8080, env = "PORT")]
    pub port: u16,

    /// Allowed CORS origin, e.g. https://app.example.com.
    #[clap(long, env = "CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    /// Secret used to sign access tokens.
    #[clap(long, env = "ACCESS_TOKEN_SECRET")]
    pub access_token_secret: String,

    /// Secret used to sign refresh tokens.
    #[clap(long, env = "REFRESH_TOKEN_SECRET")]
    pub refresh_token_secret: String,

    /// Access token lifetime in minutes.
    #[clap(long, default_value_t = 60, env = "ACCESS_TOKEN_EXPIRY_MINUTES")]
    pub access_token_expiry_minutes: i64,

    /// Refresh token lifetime in days.
    #[clap(long, default_value_t = 10, env = "REFRESH_TOKEN_EXPIRY_DAYS")]
    pub refresh_token_expiry_days: i64,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    info!("Opening SQLite database at {:?}...", cli_args.db_path);
    let store: Arc<dyn AppStore> = Arc::new(SqliteStore::new(&cli_args.db_path)?);

    let media_store = Arc::new(LocalMediaStore::new(&cli_args.media_dir)?);

    let config = ServerConfig {
        port: cli_args.port,
        cors_origin: cli_args.cors_origin,
        media_dir: cli_args.media_dir,
        requests_logging_level: cli_args.logging_level,
        secure_cookies: true,
        access_token_secret: cli_args.access_token_secret,
        refresh_token_secret: cli_args.refresh_token_secret,
        access_token_expiry_minutes: cli_args.access_token_expiry_minutes,
        refresh_token_expiry_days: cli_args.refresh_token_expiry_days,
    };

    info!("Ready to serve at port {}!", cli_args.port);
    run_server(config, store, media_store).await
}
