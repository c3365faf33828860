use axum::{
    Form, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use codepool_session::flash::{Flash, push_flash, take_flashes};

use crate::error::CodepoolError;
use crate::messages;
use crate::state::AppState;
use crate::usecase::allocation::{
    Allocation, AssignDiscountUseCase, AssignOutcome, SubmitVisitorInput, SubmitVisitorUseCase,
};

const FORM_PATH: &str = "/";

// ── GET / ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct FormView {
    pub flashes: Vec<Flash>,
}

pub async fn show_form(jar: CookieJar) -> (CookieJar, Json<FormView>) {
    let (jar, flashes) = take_flashes(jar);
    (jar, Json(FormView { flashes }))
}

// ── POST / ───────────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SubmitVisitorForm {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone: String,
}

#[derive(Serialize)]
pub struct VisitorView {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(serialize_with = "codepool_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
pub struct SubmissionView {
    pub visitor: VisitorView,
    pub discount_code: Option<String>,
    pub flashes: Vec<Flash>,
}

pub async fn submit_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SubmitVisitorForm>,
) -> Response {
    let usecase = SubmitVisitorUseCase {
        visitors: state.visitor_repo(),
    };
    let out = match usecase
        .execute(SubmitVisitorInput {
            first_name: form.first_name,
            last_name: form.last_name,
            national_id: form.national_id,
            phone: form.phone,
        })
        .await
    {
        Ok(out) => out,
        Err(e) => return e.into_redirect(jar, FORM_PATH),
    };

    let mut flashes = vec![if out.is_new {
        Flash::success(messages::REGISTERED)
    } else {
        Flash::info(messages::DETAILS_UPDATED)
    }];
    if out.allocation == Allocation::Unavailable {
        flashes.push(Flash::warning(messages::NO_CODE_AVAILABLE));
    }

    let view = SubmissionView {
        discount_code: out.allocation.code().map(str::to_owned),
        visitor: VisitorView {
            id: out.visitor.id,
            first_name: out.visitor.first_name,
            last_name: out.visitor.last_name,
            created_at: out.visitor.created_at,
        },
        flashes,
    };
    Json(view).into_response()
}

// ── GET /assign_discount/{visitor_id} ────────────────────────────────────────

pub async fn assign_discount(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(visitor_id): Path<String>,
) -> Response {
    // An unparseable id cannot name a visitor.
    let Ok(visitor_id) = visitor_id.parse::<Uuid>() else {
        return CodepoolError::VisitorNotFound.into_redirect(jar, FORM_PATH);
    };
    let usecase = AssignDiscountUseCase {
        visitors: state.visitor_repo(),
    };
    let flash = match usecase.execute(visitor_id).await {
        Ok(AssignOutcome::Assigned(_)) => Flash::success(messages::CODE_ASSIGNED),
        Ok(AssignOutcome::AlreadyReceived(_)) => Flash::warning(messages::ALREADY_RECEIVED),
        Ok(AssignOutcome::Unavailable) => Flash::danger(messages::POOL_EMPTY),
        Err(e) => return e.into_redirect(jar, FORM_PATH),
    };
    (push_flash(jar, flash), Redirect::to(FORM_PATH)).into_response()
}
