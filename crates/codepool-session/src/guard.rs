//! Session gate for admin-only routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use crate::cookie::{ADMIN_SESSION_COOKIE, clear_session_cookie, set_session_cookie};
use crate::identity::AdminIdentity;
use crate::token::{issue_session, now_secs, validate_session};
use crate::{ADMIN_LOGIN_PATH, SessionSettings};

/// Middleware validating the admin session on every request.
///
/// Missing or invalid sessions are redirected to the login page before the
/// handler runs. Sessions past half their lifetime are re-issued on the
/// response. Install with
/// `route_layer(axum::middleware::from_fn_with_state(settings, require_admin))`.
pub async fn require_admin(
    State(settings): State<SessionSettings>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = jar.get(ADMIN_SESSION_COOKIE).map(|c| c.value().to_owned()) else {
        return Redirect::to(ADMIN_LOGIN_PATH).into_response();
    };

    let session = match validate_session(&token, &settings.secret) {
        Ok(session) => session,
        Err(e) => {
            tracing::info!(error = %e, "rejected admin session");
            let jar = clear_session_cookie(jar, settings.secure_cookies);
            return (jar, Redirect::to(ADMIN_LOGIN_PATH)).into_response();
        }
    };

    request.extensions_mut().insert(AdminIdentity {
        username: session.username.clone(),
    });
    let response = next.run(request).await;

    if !session.needs_renewal(now_secs()) {
        return response;
    }
    match issue_session(&session.username, &settings.secret, settings.ttl_secs) {
        Ok((token, _)) => {
            let jar = set_session_cookie(jar, token, settings.ttl_secs, settings.secure_cookies);
            (jar, response).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to renew admin session");
            response
        }
    }
}
