//! Signed, time-bounded admin session tokens (JWT, HS256).

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Errors returned by [`validate_session`] and [`issue_session`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("session expired")]
    Expired,
    #[error("malformed session")]
    Malformed,
    #[error("failed to sign session: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
}

/// JWT claims payload of an admin session.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | admin username |
/// | `iat` | `iat` | issue time, seconds since epoch |
/// | `exp` | `exp` | expiry, seconds since epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// A validated admin session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub username: String,
    pub issued_at: u64,
    pub expires_at: u64,
}

impl AdminSession {
    /// True once more than half of the session lifetime has elapsed.
    pub fn needs_renewal(&self, now: u64) -> bool {
        let half_life = self.expires_at.saturating_sub(self.issued_at) / 2;
        now >= self.issued_at.saturating_add(half_life)
    }
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Issue a session for `username` valid for `ttl_secs` from now.
pub fn issue_session(
    username: &str,
    secret: &str,
    ttl_secs: u64,
) -> Result<(String, AdminSession), SessionError> {
    let iat = now_secs();
    let claims = SessionClaims {
        sub: username.to_owned(),
        iat,
        exp: iat.saturating_add(ttl_secs),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(SessionError::Sign)?;
    Ok((
        token,
        AdminSession {
            username: claims.sub,
            issued_at: claims.iat,
            expires_at: claims.exp,
        },
    ))
}

/// Validate a session cookie value.
///
/// HS256 only, no leeway: an expired session is rejected on the second it
/// expires.
pub fn validate_session(token: &str, secret: &str) -> Result<AdminSession, SessionError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "iat", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => SessionError::InvalidSignature,
        _ => SessionError::Malformed,
    })?;

    if data.claims.sub.is_empty() {
        return Err(SessionError::Malformed);
    }

    Ok(AdminSession {
        username: data.claims.sub,
        issued_at: data.claims.iat,
        expires_at: data.claims.exp,
    })
}
