use codepool_session::token::{AdminSession, issue_session};

use crate::domain::repository::{AdminRepository, CredentialHasher};
use crate::error::{CodepoolError, Field};

pub struct AdminLoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct AdminLoginOutput {
    pub token: String,
    pub session: AdminSession,
}

pub struct AdminLoginUseCase<A: AdminRepository, H: CredentialHasher> {
    pub admins: A,
    pub hasher: H,
    pub session_secret: String,
    pub session_ttl_secs: u64,
}

impl<A: AdminRepository, H: CredentialHasher> AdminLoginUseCase<A, H> {
    pub async fn execute(&self, input: AdminLoginInput) -> Result<AdminLoginOutput, CodepoolError> {
        let username = input.username.trim();
        if username.is_empty() {
            return Err(CodepoolError::MissingField(Field::Username));
        }
        if input.password.is_empty() {
            return Err(CodepoolError::MissingField(Field::Password));
        }

        // Unknown user and wrong password are indistinguishable to the caller.
        let admin = self
            .admins
            .find_by_username(username)
            .await?
            .ok_or(CodepoolError::InvalidCredentials)?;
        if !self.hasher.verify(&input.password, &admin.password_hash) {
            tracing::warn!(username = %admin.username, "admin login rejected");
            return Err(CodepoolError::InvalidCredentials);
        }

        let (token, session) =
            issue_session(&admin.username, &self.session_secret, self.session_ttl_secs)
                .map_err(|e| CodepoolError::Internal(e.into()))?;
        tracing::info!(username = %admin.username, "admin logged in");
        Ok(AdminLoginOutput { token, session })
    }
}
