use uuid::Uuid;

use crate::domain::repository::VisitorRepository;
use crate::domain::types::{ClaimOutcome, DiscountCode, Registration, Visitor, VisitorSubmission};
use crate::error::CodepoolError;

/// Registration attempts before a uniqueness race is reported to the caller.
/// The second attempt finds the row the winning request inserted.
const REGISTER_ATTEMPTS: usize = 2;

/// Which code the visitor holds after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allocation {
    /// Held from an earlier submission; nothing was claimed.
    Existing(String),
    /// Claimed by this submission.
    Claimed(DiscountCode),
    /// The pool is empty; the visitor holds no code.
    Unavailable,
}

impl Allocation {
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Existing(code) => Some(code),
            Self::Claimed(code) => Some(&code.code),
            Self::Unavailable => None,
        }
    }
}

// ── SubmitVisitor ────────────────────────────────────────────────────────────

pub struct SubmitVisitorInput {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone: String,
}

#[derive(Debug)]
pub struct SubmitVisitorOutput {
    pub visitor: Visitor,
    /// `true` when this submission created the visitor.
    pub is_new: bool,
    pub allocation: Allocation,
}

pub struct SubmitVisitorUseCase<R: VisitorRepository> {
    pub visitors: R,
}

impl<R: VisitorRepository> SubmitVisitorUseCase<R> {
    pub async fn execute(
        &self,
        input: SubmitVisitorInput,
    ) -> Result<SubmitVisitorOutput, CodepoolError> {
        // 1. Validate → nothing is written on failure
        let submission = VisitorSubmission::parse(
            &input.first_name,
            &input.last_name,
            &input.national_id,
            &input.phone,
        )?;

        // 2. Find-or-create (one transaction), retrying a lost insert race once
        let registration = self.register(&submission).await?;
        let is_new = registration.is_new();
        let visitor = registration.into_visitor();

        // 3. Repeat submission → return the code already held
        if let Some(code) = visitor.discount_code.clone() {
            return Ok(SubmitVisitorOutput {
                visitor,
                is_new,
                allocation: Allocation::Existing(code),
            });
        }

        // 4. Claim + bind (one transaction)
        let (visitor, allocation) = match self.visitors.claim_code(visitor.id).await? {
            ClaimOutcome::Claimed { visitor, code } => {
                tracing::info!(visitor_id = %visitor.id, code_id = %code.id, "discount code claimed");
                (visitor, Allocation::Claimed(code))
            }
            ClaimOutcome::AlreadyAssigned(visitor) => {
                let code = visitor.discount_code.clone().unwrap_or_default();
                (visitor, Allocation::Existing(code))
            }
            ClaimOutcome::PoolExhausted(visitor) => {
                tracing::warn!(visitor_id = %visitor.id, "discount code pool exhausted");
                (visitor, Allocation::Unavailable)
            }
            ClaimOutcome::VisitorMissing => return Err(CodepoolError::VisitorNotFound),
        };

        Ok(SubmitVisitorOutput {
            visitor,
            is_new,
            allocation,
        })
    }

    async fn register(
        &self,
        submission: &VisitorSubmission,
    ) -> Result<Registration, CodepoolError> {
        let mut attempt = 1;
        loop {
            match self.visitors.register(submission).await {
                Err(CodepoolError::Conflict) if attempt < REGISTER_ATTEMPTS => {
                    tracing::debug!(attempt, "visitor insert lost a race, retrying");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

// ── AssignDiscount ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    Assigned(DiscountCode),
    AlreadyReceived(String),
    Unavailable,
}

pub struct AssignDiscountUseCase<R: VisitorRepository> {
    pub visitors: R,
}

impl<R: VisitorRepository> AssignDiscountUseCase<R> {
    pub async fn execute(&self, visitor_id: Uuid) -> Result<AssignOutcome, CodepoolError> {
        match self.visitors.claim_code(visitor_id).await? {
            ClaimOutcome::Claimed { visitor, code } => {
                tracing::info!(visitor_id = %visitor.id, code_id = %code.id, "discount code claimed");
                Ok(AssignOutcome::Assigned(code))
            }
            ClaimOutcome::AlreadyAssigned(visitor) => Ok(AssignOutcome::AlreadyReceived(
                visitor.discount_code.unwrap_or_default(),
            )),
            ClaimOutcome::PoolExhausted(_) => Ok(AssignOutcome::Unavailable),
            ClaimOutcome::VisitorMissing => Err(CodepoolError::VisitorNotFound),
        }
    }
}
