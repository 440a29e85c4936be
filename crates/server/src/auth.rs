//! Bearer-token authentication for the HTTP surface.
//!
//! Tokens are HS256 JWTs whose subject is the client email. `CurrentUser`
//! extracts and loads the authenticated client; `AdminUser` additionally
//! requires the admin role.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use favly_core::config::AuthConfig;
use favly_core::domain::client::Client;
use favly_db::repositories::ClientRepository;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: Duration,
}

impl AuthKeys {
    pub fn from_config(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            expiry: Duration::minutes(i64::from(config.token_expiry_minutes)),
        }
    }

    /// Issue a bearer token for the given client email.
    pub fn issue(&self, email: &str) -> Result<String, ApiError> {
        let claims = Claims { sub: email.to_string(), exp: (Utc::now() + self.expiry).timestamp() };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|error| ApiError::Internal(format!("token encoding failed: {error}")))
    }

    /// Decode and validate a bearer token; any failure is an auth failure.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthorized)
    }
}

pub struct CurrentUser(pub Client);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;
        let token = header_value.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;

        let claims = state.auth.verify(token)?;
        let client =
            state.clients.find_by_email(&claims.sub).await?.ok_or(ApiError::Unauthorized)?;
        Ok(Self(client))
    }
}

pub struct AdminUser(pub Client);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(client) = CurrentUser::from_request_parts(parts, state).await?;
        if !client.role.is_admin() {
            return Err(ApiError::Forbidden);
        }
        Ok(Self(client))
    }
}
