#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{
    Admin, ClaimOutcome, Dashboard, DiscountCode, ImportReport, Registration, VisitorSubmission,
    Visitor,
};
use crate::error::CodepoolError;

/// Visitor records and the claim that binds a code to one.
pub trait VisitorRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Visitor>, CodepoolError>;

    /// Find the visitor matching the national id or the phone and refresh its
    /// names, or create a new one, in one transaction.
    ///
    /// Fails with `ConflictingIdentity` when the two values match different
    /// visitors and with `Conflict` when a concurrent insert won the race.
    async fn register(&self, submission: &VisitorSubmission)
    -> Result<Registration, CodepoolError>;

    /// Atomically take the earliest unused code, mark it used and bind it to
    /// the visitor (one transaction). A visitor that already holds a code is
    /// left untouched.
    async fn claim_code(&self, visitor_id: Uuid) -> Result<ClaimOutcome, CodepoolError>;
}

/// The discount code pool.
pub trait CodePoolRepository: Send + Sync {
    /// Insert each code unless its value already exists. All or nothing on
    /// store failure; repeated values within `codes` count as duplicates.
    async fn import(
        &self,
        codes: &[String],
        discount_percent: i32,
    ) -> Result<ImportReport, CodepoolError>;

    /// Insert `codes` only if the pool is empty. Returns how many were added.
    async fn seed_if_empty(
        &self,
        codes: &[&str],
        discount_percent: i32,
    ) -> Result<u64, CodepoolError>;

    /// All codes, unused first, then oldest first.
    async fn list(&self) -> Result<Vec<DiscountCode>, CodepoolError>;

    /// Counts and code holders read from a single snapshot.
    async fn dashboard(&self) -> Result<Dashboard, CodepoolError>;
}

/// Operator accounts.
pub trait AdminRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, CodepoolError>;

    /// Insert `admin` only if no admin exists. Returns `true` if inserted.
    async fn create_if_none(&self, admin: &Admin) -> Result<bool, CodepoolError>;
}

/// One-way password hashing.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, CodepoolError>;

    /// `false` for a wrong password and for an unparseable hash alike.
    fn verify(&self, password: &str, password_hash: &str) -> bool;
}
