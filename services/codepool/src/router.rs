use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use codepool_core::health::{healthz, readyz};
use codepool_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};
use codepool_session::guard::require_admin;

use crate::handlers::{
    admin::{add_codes, dashboard, list_codes, login, login_form, logout},
    visitor::{assign_discount, show_form, submit_form},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Admin pages: the session guard runs before any handler.
    let admin = Router::new()
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/discount-codes", get(list_codes))
        .route("/admin/add-discount-codes", post(add_codes))
        .route_layer(from_fn_with_state(state.session.clone(), require_admin));

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Visitor
        .route("/", get(show_form).post(submit_form))
        .route("/assign_discount/{visitor_id}", get(assign_discount))
        // Admin session
        .route("/admin/login", get(login_form).post(login))
        .route("/admin/logout", get(logout))
        .merge(admin)
        .layer(trace_layer())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
