use sea_orm::{
    DbErr, EntityTrait, QuerySelect, Select, SqlErr,
    sea_query::{LockBehavior, LockType},
};

/// Row-claiming helpers for "take one free row" queries.
pub trait ClaimFirst {
    /// Limit to one row and lock it `FOR UPDATE SKIP LOCKED`.
    ///
    /// Rows already locked by a concurrent transaction are skipped instead of
    /// waited on, so racing claimers each land on a different row or on none.
    fn claim_first(self) -> Self;
}

impl<E> ClaimFirst for Select<E>
where
    E: EntityTrait,
{
    fn claim_first(self) -> Self {
        self.limit(1_u64)
            .lock_with_behavior(LockType::Update, LockBehavior::SkipLocked)
    }
}

/// True when the store rejected a write because of a unique constraint.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
