//! Authentication route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use secure_shop_core::{Role, UserId};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAdmin, RequireAuth, destroy_session, establish_session};
use crate::models::user::User;
use crate::services::auth::{AuthService, RegisterInput};
use crate::state::AppState;

/// Registration form payload.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

/// Login form payload. The identifier may be a username or email.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Account view returned to clients. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username.into_inner(),
            email: user.email.into_inner(),
            role: user.role,
            full_name: user.full_name,
            phone_number: user.phone_number,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

fn auth_service(state: &AppState) -> AuthService<'_> {
    AuthService::new(
        state.pool(),
        state.hasher(),
        state.config().password_min_length,
    )
}

/// Query for the registration availability probe.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Availability of requested identifiers. Fields not asked about are omitted.
#[derive(Debug, Serialize)]
pub struct AvailabilityView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<bool>,
}

/// GET /auth/availability
///
/// Registration UX helper: reports whether a username or email is still
/// free. This only says an account with that identifier exists, which the
/// registration conflict response reveals anyway.
pub async fn availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityView>> {
    let service = auth_service(&state);

    let username = match query.username.as_deref() {
        Some(username) => Some(service.username_available(username).await?),
        None => None,
    };
    let email = match query.email.as_deref() {
        Some(email) => Some(service.email_available(email).await?),
        None => None,
    };

    Ok(Json(AvailabilityView { username, email }))
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserView>)> {
    let user = auth_service(&state)
        .register(RegisterInput {
            username: &req.username,
            email: &req.email,
            password: &req.password,
            confirm_password: &req.confirm_password,
            full_name: req.full_name.as_deref(),
            phone_number: req.phone_number.as_deref(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<UserView>> {
    let user = auth_service(&state)
        .authenticate(&req.identifier, &req.password)
        .await?;

    establish_session(&session, &user)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(Json(user.into()))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Result<StatusCode> {
    destroy_session(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<UserView>> {
    let user = auth_service(&state).get_user(current.id).await?;

    Ok(Json(user.into()))
}

/// Payload for enabling or disabling an account.
#[derive(Debug, Deserialize)]
pub struct SetEnabledRequest {
    pub enabled: bool,
}

/// Payload for changing an account's role.
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

/// POST /auth/admin/users/{id}/enabled
pub async fn set_enabled(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(user_id): Path<i64>,
    Json(req): Json<SetEnabledRequest>,
) -> Result<StatusCode> {
    auth_service(&state)
        .set_account_enabled(UserId::new(user_id), req.enabled)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /auth/admin/users/{id}/role
pub async fn set_role(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(user_id): Path<i64>,
    Json(req): Json<SetRoleRequest>,
) -> Result<StatusCode> {
    auth_service(&state)
        .set_account_role(UserId::new(user_id), req.role)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
