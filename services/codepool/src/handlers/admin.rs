use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use codepool_core::serde::to_rfc3339_ms;
use codepool_session::cookie::{clear_session_cookie, set_session_cookie};
use codepool_session::flash::{Flash, push_flash, take_flashes};
use codepool_session::identity::AdminIdentity;
use codepool_session::ADMIN_LOGIN_PATH;

use crate::domain::types::{DiscountCode, Visitor};
use crate::messages;
use crate::state::AppState;
use crate::usecase::admin::{AdminLoginInput, AdminLoginUseCase};
use crate::usecase::import::ImportCodesUseCase;
use crate::usecase::report::{DashboardUseCase, ListCodesUseCase};

pub const DASHBOARD_PATH: &str = "/admin/dashboard";
pub const CODES_PATH: &str = "/admin/discount-codes";

// ── GET /admin/login ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct LoginView {
    pub flashes: Vec<Flash>,
}

pub async fn login_form(jar: CookieJar) -> (CookieJar, Json<LoginView>) {
    let (jar, flashes) = take_flashes(jar);
    (jar, Json(LoginView { flashes }))
}

// ── POST /admin/login ────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let usecase = AdminLoginUseCase {
        admins: state.admin_repo(),
        hasher: state.hasher(),
        session_secret: state.session.secret.clone(),
        session_ttl_secs: state.session.ttl_secs,
    };
    match usecase
        .execute(AdminLoginInput {
            username: form.username,
            password: form.password,
        })
        .await
    {
        Ok(out) => {
            let jar = set_session_cookie(
                jar,
                out.token,
                state.session.ttl_secs,
                state.session.secure_cookies,
            );
            (jar, Redirect::to(DASHBOARD_PATH)).into_response()
        }
        Err(e) => e.into_redirect(jar, ADMIN_LOGIN_PATH),
    }
}

// ── GET /admin/logout ────────────────────────────────────────────────────────

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let jar = clear_session_cookie(jar, state.session.secure_cookies);
    let jar = push_flash(jar, Flash::info(messages::LOGGED_OUT));
    (jar, Redirect::to(ADMIN_LOGIN_PATH)).into_response()
}

// ── GET /admin/dashboard ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HolderView {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone: String,
    pub discount_code: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Visitor> for HolderView {
    fn from(v: Visitor) -> Self {
        Self {
            id: v.id,
            first_name: v.first_name,
            last_name: v.last_name,
            national_id: v.national_id,
            phone: v.phone,
            discount_code: v.discount_code,
            created_at: v.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct DashboardView {
    pub admin: String,
    pub total_visitors: u64,
    pub visitors_with_code: u64,
    pub total_codes: u64,
    pub used_codes: u64,
    pub unused_codes: u64,
    pub holders: Vec<HolderView>,
    pub flashes: Vec<Flash>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    identity: AdminIdentity,
    jar: CookieJar,
) -> Response {
    let usecase = DashboardUseCase {
        pool: state.code_pool_repo(),
    };
    let dashboard = match usecase.execute().await {
        Ok(d) => d,
        Err(e) => return e.into_redirect(jar, ADMIN_LOGIN_PATH),
    };
    let (jar, flashes) = take_flashes(jar);
    let stats = dashboard.stats;
    let view = DashboardView {
        admin: identity.username,
        total_visitors: stats.total_visitors,
        visitors_with_code: stats.visitors_with_code,
        total_codes: stats.total_codes,
        used_codes: stats.used_codes,
        unused_codes: stats.unused_codes(),
        holders: dashboard.holders.into_iter().map(HolderView::from).collect(),
        flashes,
    };
    (jar, Json(view)).into_response()
}

// ── GET /admin/discount-codes ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CodeView {
    pub id: Uuid,
    pub code: String,
    pub is_used: bool,
    pub discount_percent: i32,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<DiscountCode> for CodeView {
    fn from(c: DiscountCode) -> Self {
        Self {
            id: c.id,
            code: c.code,
            is_used: c.is_used,
            discount_percent: c.discount_percent,
            created_at: c.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct CodesView {
    pub codes: Vec<CodeView>,
    pub flashes: Vec<Flash>,
}

pub async fn list_codes(
    State(state): State<AppState>,
    _identity: AdminIdentity,
    jar: CookieJar,
) -> Response {
    let usecase = ListCodesUseCase {
        pool: state.code_pool_repo(),
    };
    let codes = match usecase.execute().await {
        Ok(codes) => codes,
        Err(e) => return e.into_redirect(jar, DASHBOARD_PATH),
    };
    let (jar, flashes) = take_flashes(jar);
    let view = CodesView {
        codes: codes.into_iter().map(CodeView::from).collect(),
        flashes,
    };
    (jar, Json(view)).into_response()
}

// ── POST /admin/add-discount-codes ───────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct AddCodesForm {
    pub codes: String,
}

pub async fn add_codes(
    State(state): State<AppState>,
    _identity: AdminIdentity,
    jar: CookieJar,
    Form(form): Form<AddCodesForm>,
) -> Response {
    let usecase = ImportCodesUseCase {
        pool: state.code_pool_repo(),
    };
    match usecase.execute(&form.codes).await {
        Ok(report) => {
            let flash = Flash::success(messages::codes_imported(report.added, report.duplicates));
            (push_flash(jar, flash), Redirect::to(CODES_PATH)).into_response()
        }
        Err(e) => e.into_redirect(jar, CODES_PATH),
    }
}
