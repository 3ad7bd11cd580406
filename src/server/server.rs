use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue, Method};
use axum::middleware;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

use super::http_layers::log_requests;
use super::state::ServerState;
use super::{
    comment_routes, dashboard_routes, like_routes, playlist_routes, response,
    subscription_routes, tweet_routes, user_routes, video_routes, ApiError, ServerConfig,
};
use crate::media_store::MediaStore;
use crate::user::TokenService;
use crate::AppStore;

const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> Response {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    };
    response::ok("Server stats fetched successfully", stats)
}

async fn healthcheck() -> Response {
    response::ok("Service is healthy", serde_json::Value::Null)
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_owned())
}

pub fn make_app(
    config: ServerConfig,
    store: Arc<dyn AppStore>,
    media_store: Arc<dyn MediaStore>,
) -> Result<Router> {
    let token_service = TokenService::new(
        &config.access_token_secret,
        &config.refresh_token_secret,
        config.access_token_expiry_minutes,
        config.refresh_token_expiry_days,
    );
    let state = ServerState {
        config: config.clone(),
        start_time: Instant::now(),
        store,
        media_store,
        token_service,
    };

    let mut app: Router = Router::new()
        .route("/", get(home))
        .route("/health", get(healthcheck))
        .with_state(state.clone())
        .nest("/users", user_routes::routes(state.clone()))
        .nest("/videos", video_routes::routes(state.clone()))
        .nest("/comments", comment_routes::routes(state.clone()))
        .nest("/likes", like_routes::routes(state.clone()))
        .nest("/subscriptions", subscription_routes::routes(state.clone()))
        .nest("/playlists", playlist_routes::routes(state.clone()))
        .nest("/tweets", tweet_routes::routes(state.clone()))
        .nest("/dashboard", dashboard_routes::routes(state.clone()))
        .nest_service("/media", ServeDir::new(&config.media_dir))
        .fallback(route_not_found);

    if let Some(origin) = &config.cors_origin {
        let cors = CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin {origin}"))?,
            )
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true);
        app = app.layer(cors);
    }

    app = app.layer(middleware::from_fn_with_state(state, log_requests));
    app = app.layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Ok(app)
}

pub async fn run_server(
    config: ServerConfig,
    store: Arc<dyn AppStore>,
    media_store: Arc<dyn MediaStore>,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, store, media_store)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;
    info!("Listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media_store::LocalMediaStore;
    use crate::sqlite_store::SqliteStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app(media_dir: &std::path::Path) -> Router {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let media_store = Arc::new(LocalMediaStore::new(media_dir).unwrap());
        let config = ServerConfig {
            requests_logging_level: crate::RequestsLoggingLevel::None,
            media_dir: media_dir.to_path_buf(),
            ..ServerConfig::default()
        };
        make_app(config, store, media_store).unwrap()
    }

    #[tokio::test]
    async fn responds_unauthorized_on_protected_routes() {
        let media_dir = tempfile::TempDir::new().unwrap();
        let app = test_app(media_dir.path());

        let protected_routes = vec![
            ("GET", "/users/current"),
            ("POST", "/users/logout"),
            ("GET", "/users/watch-history"),
            ("GET", "/likes/videos"),
            ("GET", "/dashboard/stats"),
            ("GET", "/dashboard/videos"),
        ];

        for (method, route) in protected_routes.into_iter() {
            let request = Request::builder()
                .method(method)
                .uri(route)
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "route {method} {route}"
            );
        }
    }

    #[tokio::test]
    async fn healthcheck_is_public() {
        let media_dir = tempfile::TempDir::new().unwrap();
        let app = test_app(media_dir.path());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_routes_render_the_envelope_404() {
        let media_dir = tempfile::TempDir::new().unwrap();
        let app = test_app(media_dir.path());

        let request = Request::builder()
            .uri("/definitely/not/a/route")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
