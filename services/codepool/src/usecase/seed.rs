use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{AdminRepository, CodePoolRepository, CredentialHasher};
use crate::domain::types::{Admin, DEFAULT_DISCOUNT_PERCENT, INITIAL_CODES};
use crate::error::CodepoolError;

pub struct SeedInput {
    pub admin_username: String,
    pub admin_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub codes_added: u64,
    pub admin_created: bool,
}

/// Startup seeding: initial codes into an empty pool, one default admin when
/// none exists. Safe to run on every start.
pub struct SeedUseCase<P: CodePoolRepository, A: AdminRepository, H: CredentialHasher> {
    pub pool: P,
    pub admins: A,
    pub hasher: H,
}

impl<P, A, H> SeedUseCase<P, A, H>
where
    P: CodePoolRepository,
    A: AdminRepository,
    H: CredentialHasher,
{
    pub async fn execute(&self, input: SeedInput) -> Result<SeedReport, CodepoolError> {
        let codes_added = self
            .pool
            .seed_if_empty(&INITIAL_CODES, DEFAULT_DISCOUNT_PERCENT)
            .await?;

        // Hash only when there is a chance of inserting.
        let admin_created = if self
            .admins
            .find_by_username(&input.admin_username)
            .await?
            .is_some()
        {
            false
        } else {
            let admin = Admin {
                id: Uuid::now_v7(),
                username: input.admin_username,
                password_hash: self.hasher.hash(&input.admin_password)?,
                created_at: Utc::now(),
            };
            self.admins.create_if_none(&admin).await?
        };

        tracing::info!(codes_added, admin_created, "startup seeding finished");
        Ok(SeedReport {
            codes_added,
            admin_created,
        })
    }
}
