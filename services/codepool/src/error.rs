use std::fmt;

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use codepool_session::flash::{Flash, push_flash};

use crate::messages;

/// Form fields named by validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    NationalId,
    Phone,
    Username,
    Password,
    Codes,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::NationalId => "national_id",
            Self::Phone => "phone",
            Self::Username => "username",
            Self::Password => "password",
            Self::Codes => "codes",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Codepool service error variants.
#[derive(Debug, thiserror::Error)]
pub enum CodepoolError {
    #[error("missing field: {0}")]
    MissingField(Field),
    #[error("invalid field: {0}")]
    InvalidField(Field),
    #[error("national id and phone belong to different visitors")]
    ConflictingIdentity,
    #[error("concurrent write conflict")]
    Conflict,
    #[error("visitor not found")]
    VisitorNotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl CodepoolError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidField(_) => "INVALID_FIELD",
            Self::ConflictingIdentity => "CONFLICTING_IDENTITY",
            Self::Conflict => "CONFLICT",
            Self::VisitorNotFound => "VISITOR_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Message shown to the user on the page they are sent back to.
    pub fn flash(&self) -> Flash {
        let message = match self {
            Self::MissingField(Field::Username | Field::Password) => messages::LOGIN_FIELDS_REQUIRED,
            Self::MissingField(Field::Codes) => messages::CODES_REQUIRED,
            Self::InvalidField(Field::NationalId) => messages::NATIONAL_ID_INVALID,
            Self::InvalidField(Field::Phone) => messages::PHONE_INVALID,
            Self::MissingField(_) | Self::InvalidField(_) => messages::FILL_ALL_FIELDS,
            Self::ConflictingIdentity => messages::CONFLICTING_IDENTITY,
            Self::VisitorNotFound => messages::VISITOR_NOT_FOUND,
            Self::InvalidCredentials => messages::INVALID_CREDENTIALS,
            Self::Conflict | Self::Internal(_) => messages::TRY_AGAIN,
        };
        Flash::danger(message)
    }

    /// Send the user back to `to` with the error as a flash message.
    pub fn into_redirect(self, jar: CookieJar, to: &str) -> Response {
        // Internal errors carry the anyhow chain; everything else is an
        // expected outcome of user input and is already visible in the trace span.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        } else {
            tracing::debug!(kind = self.kind(), "request rejected");
        }
        let jar = push_flash(jar, self.flash());
        (jar, Redirect::to(to)).into_response()
    }
}
