//! Authenticated-admin extractor.

use axum::extract::FromRequestParts;
use axum::response::Redirect;
use http::request::Parts;

use crate::ADMIN_LOGIN_PATH;

/// The admin behind a request that passed [`crate::guard::require_admin`].
///
/// The guard stores it in request extensions; outside a guarded route the
/// extractor redirects to the login page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub username: String,
}

impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    // Read extensions synchronously and hand back a 'static future; an
    // `async fn` here would capture the `parts` borrow.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parts.extensions.get::<AdminIdentity>().cloned();
        async move { identity.ok_or_else(|| Redirect::to(ADMIN_LOGIN_PATH)) }
    }
}
