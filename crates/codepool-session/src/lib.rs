//! Admin session and flash-message plumbing for the Codepool web service.
//!
//! Provides the signed session token, cookie builders, the session guard
//! middleware and the `AdminIdentity` extractor.

pub mod cookie;
pub mod flash;
pub mod guard;
pub mod identity;
pub mod token;

/// Where unauthenticated admin requests are sent.
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

/// Session signing and cookie settings, cloned into the guard layer.
#[derive(Clone)]
pub struct SessionSettings {
    /// HMAC secret for HS256 session tokens.
    pub secret: String,
    /// Session lifetime in seconds.
    pub ttl_secs: u64,
    /// Whether cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
}
