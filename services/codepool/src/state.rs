use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use codepool_session::SessionSettings;

use crate::infra::db::{DbAdminRepository, DbCodePoolRepository, DbVisitorRepository};
use crate::infra::password::Argon2Hasher;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub session: SessionSettings,
}

impl AppState {
    pub fn visitor_repo(&self) -> DbVisitorRepository {
        DbVisitorRepository {
            db: self.db.clone(),
        }
    }

    pub fn code_pool_repo(&self) -> DbCodePoolRepository {
        DbCodePoolRepository {
            db: self.db.clone(),
        }
    }

    pub fn admin_repo(&self) -> DbAdminRepository {
        DbAdminRepository {
            db: self.db.clone(),
        }
    }

    pub fn hasher(&self) -> Argon2Hasher {
        Argon2Hasher
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for SessionSettings {
    fn from_ref(state: &AppState) -> Self {
        state.session.clone()
    }
}
