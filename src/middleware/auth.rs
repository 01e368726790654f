use crate::entities::user::{self, Entity as UserEntity, Role};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::{str::FromStr, sync::Arc};
use thiserror::Error;

const ACCESS_TOKEN_HOURS: i64 = 1;
const REFRESH_TOKEN_DAYS: i64 = 14;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub role: String,
    pub kind: TokenKind,
    pub exp: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Per-router guard config. `role: None` means any signed-in user passes.
#[derive(Clone, Debug)]
pub struct AuthState {
    pub db: Arc<DatabaseConnection>,
    pub role: Option<Role>,
}

/// Missing/invalid credentials yield 401, a valid session with an
/// insufficient role yields 403. Owner satisfies every role requirement.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => match header.strip_prefix("Bearer ") {
            Some(token) => token,
            _ => return Err(StatusCode::UNAUTHORIZED),
        },
        _ => return Err(StatusCode::UNAUTHORIZED),
    };

    let claims = match validate_token(state.db, token, state.role).await {
        Ok(claims) => claims,
        Err(AuthError::InsufficientRole) => return Err(StatusCode::FORBIDDEN),
        Err(err) => {
            tracing::debug!(error = %err, "Rejected bearer token");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub fn generate_token_pair(user_id: i32, role: Role) -> Result<(String, String), AuthError> {
    let access = generate_token(user_id, role, TokenKind::Access)?;
    let refresh = generate_token(user_id, role, TokenKind::Refresh)?;
    Ok((access, refresh))
}

fn generate_token(user_id: i32, role: Role, kind: TokenKind) -> Result<String, AuthError> {
    let lifetime = match kind {
        TokenKind::Access => Duration::hours(ACCESS_TOKEN_HOURS),
        TokenKind::Refresh => Duration::days(REFRESH_TOKEN_DAYS),
    };
    let exp = Utc::now()
        .checked_add_signed(lifetime)
        .ok_or(AuthError::GenerationFail)?
        .timestamp() as usize;

    let claims = Claims {
        user_id,
        role: role.to_string(),
        kind,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_secret_key().as_bytes()),
    )
    .map_err(|_| AuthError::GenerationFail)
}

/// Decodes and checks the token against the user table, so a token minted
/// for a deleted or demoted user is rejected even before its expiry.
pub async fn validate_token(
    db: Arc<DatabaseConnection>,
    token: &str,
    required_role: Option<Role>,
) -> Result<Claims, AuthError> {
    let claims = decode_claims(token, TokenKind::Access)?;

    let role = Role::from_str(&claims.role).map_err(|_| AuthError::ValidationFail)?;

    match UserEntity::find_by_id(claims.user_id)
        .filter(user::Column::Role.eq(role))
        .one(&*db)
        .await
    {
        Ok(Some(_)) => match required_role {
            Some(required) if !role.satisfies(required) => Err(AuthError::InsufficientRole),
            _ => Ok(claims),
        },
        Ok(None) => Err(AuthError::InvalidUserOrRole),
        Err(_) => Err(AuthError::InternalServerError),
    }
}

/// Decode pass only, used by the refresh endpoint with `TokenKind::Refresh`.
pub fn decode_claims(token: &str, expected_kind: TokenKind) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_secret_key().as_bytes()),
        &validation,
    )
    .map_err(|_| AuthError::TokenExpired)?;

    if token_data.claims.kind != expected_kind {
        return Err(AuthError::WrongTokenKind);
    }

    Ok(token_data.claims)
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid user id or role")]
    InvalidUserOrRole,
    #[error("Role does not satisfy this route's requirement")]
    InsufficientRole,
    #[error("Token expired or malformed")]
    TokenExpired,
    #[error("Token kind not accepted here")]
    WrongTokenKind,
    #[error("Failed to validate token")]
    ValidationFail,
    #[error("Failed to generate token")]
    GenerationFail,
    #[error("Internal server error")]
    InternalServerError,
}

fn get_secret_key() -> String {
    dotenvy::dotenv().ok();
    std::env::var("SECRET").expect("SECRET not found in environment")
}
