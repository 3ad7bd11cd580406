//! Account, login/refresh/logout and profile endpoints.

use super::error::ApiError;
use super::multipart::FormData;
use super::response;
use super::session::{Session, COOKIE_ACCESS_TOKEN, COOKIE_REFRESH_TOKEN};
use super::state::ServerState;
use crate::media_store::MediaKind;
use crate::user::{auth, AccountUpdate, NewUser, PublicUser, TokenKind};

use axum::extract::{Multipart, Path, State};
use axum::http::header::SET_COOKIE;
use axum::response::Response;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Deserialize, Debug)]
struct LoginBody {
    username: Option<String>,
    email: Option<String>,
    password: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct RefreshBody {
    refresh_token: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordBody {
    old_password: String,
    new_password: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UpdateAccountBody {
    full_name: Option<String>,
    email: Option<String>,
}

fn auth_cookie(name: &'static str, value: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value.to_owned()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .expires(time::OffsetDateTime::now_utc() - time::Duration::days(1))
        .build()
}

fn with_cookies(mut response: Response, cookies: &[Cookie<'static>]) -> Result<Response, ApiError> {
    for cookie in cookies {
        let value = cookie
            .to_string()
            .parse()
            .map_err(|err| ApiError::Internal(anyhow::anyhow!("Invalid cookie header: {err}")))?;
        response.headers_mut().append(SET_COOKIE, value);
    }
    Ok(response)
}

/// Issues a fresh access/refresh pair and persists the refresh token,
/// invalidating whichever one was stored before.
fn issue_token_pair(state: &ServerState, user_id: &str) -> Result<(String, String), ApiError> {
    let access_token = state.token_service.issue_access(user_id)?;
    let refresh_token = state.token_service.issue_refresh(user_id)?;
    state
        .store
        .set_refresh_token(user_id, Some(&refresh_token))?;
    Ok((access_token, refresh_token))
}

async fn register_user(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = FormData::read(multipart).await?;

    let missing_field = || ApiError::Validation("All fields are required".to_owned());
    let full_name = form.trimmed("fullName").ok_or_else(missing_field)?;
    let email = form.trimmed("email").ok_or_else(missing_field)?;
    let username = form.trimmed("username").ok_or_else(missing_field)?.to_lowercase();
    let password = form
        .text("password")
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(missing_field)?;

    if state.store.username_or_email_exists(&username, email)? {
        return Err(ApiError::Conflict(
            "Username or email already exists".to_owned(),
        ));
    }

    let avatar = form
        .file("avatar")
        .ok_or_else(|| ApiError::Validation("Avatar is required".to_owned()))?;
    let avatar_url = state.media_store.store(avatar, MediaKind::Image)?.url;
    let cover_image_url = match form.file("coverImage") {
        Some(bytes) => Some(state.media_store.store(bytes, MediaKind::Image)?.url),
        None => None,
    };

    let new_user = NewUser {
        id: Uuid::new_v4().to_string(),
        username,
        email: email.to_owned(),
        full_name: full_name.to_owned(),
        password_hash: auth::hash_password(password)?,
        avatar_url,
        cover_image_url,
    };
    let user = state
        .store
        .create_user(&new_user)
        .map_err(|err| ApiError::from_store(err, "Username or email already exists"))?;

    Ok(response::created(
        "User registered successfully",
        PublicUser::from(user),
    ))
}

async fn login_user(
    State(state): State<ServerState>,
    Json(body): Json<LoginBody>,
) -> Result<Response, ApiError> {
    let non_empty = |s: &&str| !s.trim().is_empty();
    let handle = body
        .username
        .as_deref()
        .filter(non_empty)
        .or(body.email.as_deref().filter(non_empty))
        .ok_or_else(|| ApiError::Validation("Username or email is required".to_owned()))?;

    let user = state
        .store
        .get_user_by_handle(handle)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_owned()))?;

    if !auth::verify_password(&body.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized("Invalid user password".to_owned()));
    }

    let (access_token, refresh_token) = issue_token_pair(&state, &user.id)?;
    let data = json!({
        "user": PublicUser::from(user),
        "accessToken": &access_token,
        "refreshToken": &refresh_token,
    });
    with_cookies(
        response::ok("User logged in successfully", data),
        &[
            auth_cookie(COOKIE_ACCESS_TOKEN, &access_token, state.config.secure_cookies),
            auth_cookie(COOKIE_REFRESH_TOKEN, &refresh_token, state.config.secure_cookies),
        ],
    )
}

async fn logout_user(
    session: Session,
    State(state): State<ServerState>,
) -> Result<Response, ApiError> {
    state.store.set_refresh_token(session.user_id(), None)?;

    with_cookies(
        response::ok("User logged out successfully", serde_json::Value::Null),
        &[
            expired_cookie(COOKIE_ACCESS_TOKEN, state.config.secure_cookies),
            expired_cookie(COOKIE_REFRESH_TOKEN, state.config.secure_cookies),
        ],
    )
}

async fn refresh_access_token(
    State(state): State<ServerState>,
    jar: CookieJar,
    body: axum::body::Bytes,
) -> Result<Response, ApiError> {
    let incoming = jar
        .get(COOKIE_REFRESH_TOKEN)
        .map(|cookie| cookie.value().to_owned())
        .or_else(|| {
            serde_json::from_slice::<RefreshBody>(&body)
                .ok()
                .and_then(|body| body.refresh_token)
        })
        .ok_or_else(|| ApiError::Validation("Refresh token is required".to_owned()))?;

    let claims = state.token_service.verify(&incoming, TokenKind::Refresh)?;
    let user = state
        .store
        .get_user(&claims.sub)?
        .ok_or_else(|| ApiError::Unauthorized("Invalid refresh token".to_owned()))?;

    // A rotated-out token still carries a valid signature; only the stored
    // value is accepted, so reuse of an old one is rejected here.
    if user.refresh_token.as_deref() != Some(incoming.as_str()) {
        return Err(ApiError::Unauthorized(
            "Refresh token is expired or already used".to_owned(),
        ));
    }

    let (access_token, refresh_token) = issue_token_pair(&state, &user.id)?;
    let data = json!({
        "accessToken": &access_token,
        "refreshToken": &refresh_token,
    });
    with_cookies(
        response::ok("Access token refreshed successfully", data),
        &[
            auth_cookie(COOKIE_ACCESS_TOKEN, &access_token, state.config.secure_cookies),
            auth_cookie(COOKIE_REFRESH_TOKEN, &refresh_token, state.config.secure_cookies),
        ],
    )
}

async fn change_current_password(
    session: Session,
    State(state): State<ServerState>,
    Json(body): Json<ChangePasswordBody>,
) -> Result<Response, ApiError> {
    if body.new_password.trim().is_empty() {
        return Err(ApiError::Validation("New password is required".to_owned()));
    }

    let user = state
        .store
        .get_user(session.user_id())?
        .ok_or_else(|| ApiError::Unauthorized("Invalid access token".to_owned()))?;

    if !auth::verify_password(&body.old_password, &user.password_hash)? {
        return Err(ApiError::Validation("Old password is incorrect".to_owned()));
    }

    let password_hash = auth::hash_password(&body.new_password)?;
    state.store.set_password_hash(&user.id, &password_hash)?;

    Ok(response::ok(
        "Password changed successfully",
        serde_json::Value::Null,
    ))
}

async fn get_current_user(session: Session) -> Response {
    response::ok("Current user fetched successfully", session.user)
}

async fn update_account_details(
    session: Session,
    State(state): State<ServerState>,
    Json(body): Json<UpdateAccountBody>,
) -> Result<Response, ApiError> {
    let normalize = |field: Option<String>, name: &str| -> Result<Option<String>, ApiError> {
        match field {
            None => Ok(None),
            Some(value) => {
                let value = value.trim().to_owned();
                if value.is_empty() {
                    Err(ApiError::Validation(format!("{name} cannot be empty")))
                } else {
                    Ok(Some(value))
                }
            }
        }
    };

    let update = AccountUpdate {
        full_name: normalize(body.full_name, "Fullname")?,
        email: normalize(body.email, "Email")?,
    };
    if update.full_name.is_none() && update.email.is_none() {
        return Err(ApiError::Validation("Nothing to update".to_owned()));
    }

    let user = state
        .store
        .update_account(session.user_id(), &update)
        .map_err(|err| ApiError::from_store(err, "Email already exists"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_owned()))?;

    Ok(response::ok(
        "User details updated successfully",
        PublicUser::from(user),
    ))
}

async fn update_user_avatar(
    session: Session,
    State(state): State<ServerState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = FormData::read(multipart).await?;
    let avatar = form
        .file("avatar")
        .ok_or_else(|| ApiError::Validation("Avatar file is missing".to_owned()))?;

    let avatar_url = state.media_store.store(avatar, MediaKind::Image)?.url;
    let user = state
        .store
        .set_avatar(session.user_id(), &avatar_url)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_owned()))?;

    Ok(response::ok(
        "Avatar updated successfully",
        PublicUser::from(user),
    ))
}

async fn update_user_cover_image(
    session: Session,
    State(state): State<ServerState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = FormData::read(multipart).await?;
    let cover_image = form
        .file("coverImage")
        .ok_or_else(|| ApiError::Validation("Cover image file is missing".to_owned()))?;

    let cover_image_url = state.media_store.store(cover_image, MediaKind::Image)?.url;
    let user = state
        .store
        .set_cover_image(session.user_id(), &cover_image_url)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_owned()))?;

    Ok(response::ok(
        "Cover image updated successfully",
        PublicUser::from(user),
    ))
}

async fn get_user_channel_profile(
    session: Session,
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Response, ApiError> {
    let username = username.trim().to_lowercase();
    if username.is_empty() {
        return Err(ApiError::Validation("Username is required".to_owned()));
    }

    let profile = state
        .store
        .channel_profile(&username, Some(session.user_id()))?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_owned()))?;

    Ok(response::ok("Channel profile fetched successfully", profile))
}

async fn get_watch_history(
    session: Session,
    State(state): State<ServerState>,
) -> Result<Response, ApiError> {
    let history = state.store.watch_history(session.user_id())?;
    Ok(response::ok("Watch history fetched successfully", history))
}

pub(super) fn routes(state: ServerState) -> Router {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/logout", post(logout_user))
        .route("/refresh-token", post(refresh_access_token))
        .route("/change-password", post(change_current_password))
        .route("/current", get(get_current_user))
        .route("/update-account", patch(update_account_details))
        .route("/avatar", patch(update_user_avatar))
        .route("/cover-image", patch(update_user_cover_image))
        .route("/channel/{username}", get(get_user_channel_profile))
        .route("/watch-history", get(get_watch_history))
        .with_state(state)
}
