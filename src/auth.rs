use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json, RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Display;

use crate::AppState;

// JWT claims for a signed-in commenter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub email: String,
    pub name: String,
    pub exp: u64,
}

/// The commenter behind a request, taken from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
    pub name: String,
}

impl Display for AuthUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "User: {} <{}>", self.name, self.email)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Extract the token from the authorization header
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthError::MissingToken)?;

        let claims = validate_token(bearer.token(), &state.jwt_secret)?;

        Ok(AuthUser {
            email: claims.email,
            name: claims.name,
        })
    }
}

/// Signs a token for `email` that expires after `ttl_hours`.
pub fn issue_token(
    email: &str,
    name: &str,
    secret: &str,
    ttl_hours: i64,
) -> anyhow::Result<String> {
    let exp = chrono::Utc::now() + chrono::Duration::hours(ttl_hours);
    let claims = Claims {
        email: email.to_string(),
        name: name.to_string(),
        exp: u64::try_from(exp.timestamp()).unwrap_or(0),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))
}

pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("Token validation failed: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        }
    })
}

// Auth error types
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authorization token"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authorization token"),
            AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token has expired"),
        };
        let body = Json(json!({
            "error": error_message,
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_issued_token_validates() {
        let token = issue_token("ned@example.com", "Ned Stark", SECRET, 1).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.email, "ned@example.com");
        assert_eq!(claims.name, "Ned Stark");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token("ned@example.com", "Ned Stark", SECRET, 1).unwrap();
        assert_eq!(
            validate_token(&token, "other-secret").unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Well past the default 60s leeway.
        let token = issue_token("ned@example.com", "Ned Stark", SECRET, -2).unwrap();
        assert_eq!(
            validate_token(&token, SECRET).unwrap_err(),
            AuthError::ExpiredToken
        );
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert_eq!(
            validate_token("not.a.token", SECRET).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn test_display() {
        let user = AuthUser {
            email: "ned@example.com".to_string(),
            name: "Ned".to_string(),
        };
        assert_eq!(user.to_string(), "User: Ned <ned@example.com>");
    }
}
