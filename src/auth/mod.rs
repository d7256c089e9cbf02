//! Caller identity. Tokens are issued elsewhere; this crate only verifies them
//! and hands the resolved owner id to the event handlers.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::routes::AppState;
use crate::utils::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid or expired token")]
    InvalidToken,
}

/// Resolves a bearer token to the id of the user making the request.
pub trait IdentityProvider: Send + Sync {
    fn identify(&self, token: &str) -> Result<Uuid, IdentityError>;
}

/// HS256 JWT verification with the shared secret.
pub struct JwtIdentityProvider {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

impl IdentityProvider for JwtIdentityProvider {
    fn identify(&self, token: &str) -> Result<Uuid, IdentityError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                IdentityError::InvalidToken
            })
    }
}

/// The authenticated caller. Extracting it fails with 401 before any handler
/// body runs.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(IdentityError::MissingToken)?;

        let owner = state.identity.identify(token.trim())?;
        Ok(AuthUser(owner))
    }
}
