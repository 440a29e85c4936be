use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use favly_core::domain::client::{Client, NewClient, Role};
use favly_core::password::{hash_password, verify_password};
use favly_db::repositories::ClientRepository;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: &'static str,
    pub created_at: String,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id.0,
            name: client.name,
            email: client.email,
            role: client.role.as_str(),
            created_at: client.created_at.to_rfc3339(),
        }
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > 100 {
        return Err(ApiError::BadRequest("name must be between 1 and 100 characters".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<(), ApiError> {
    let trimmed = email.trim();
    let valid = trimmed
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(ApiError::BadRequest("email address is not valid".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), ApiError> {
    let length = password.chars().count();
    if !(6..=128).contains(&length) {
        return Err(ApiError::BadRequest(
            "password must be between 6 and 128 characters".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Create a regular client account; admins are seeded via the CLI or the
/// admin client surface.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ClientResponse>), ApiError> {
    validate_name(&request.name)?;
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    let email = normalize_email(&request.email);
    if state.clients.find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("email already registered".to_string()));
    }

    let client = state
        .clients
        .create(NewClient {
            name: request.name.trim().to_string(),
            email,
            password_hash: hash_password(&request.password)?,
            role: Role::User,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(client.into())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = normalize_email(&request.email);
    let client = state.clients.find_by_email(&email).await?.ok_or(ApiError::Unauthorized)?;

    if !verify_password(&client.password_hash, &request.password)? {
        return Err(ApiError::Unauthorized);
    }

    let access_token = state.auth.issue(&client.email)?;
    Ok(Json(TokenResponse { access_token, token_type: "bearer" }))
}

pub async fn me(CurrentUser(client): CurrentUser) -> Json<ClientResponse> {
    Json(client.into())
}
