use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CodepoolError, Field};

/// Discount granted by codes created without an explicit percent.
pub const DEFAULT_DISCOUNT_PERCENT: i32 = 32;

/// Codes placed in an empty pool at first startup.
pub const INITIAL_CODES: [&str; 5] = [
    "identendo48153",
    "identendo65738",
    "identendo41786",
    "identendo86139",
    "identendo35262",
];

pub const NATIONAL_ID_LEN: usize = 10;
pub const PHONE_LEN: usize = 11;
pub const PHONE_PREFIX: &str = "09";

/// A person who submitted the public form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visitor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone: String,
    /// Set once by a claim, never cleared.
    pub discount_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A code in the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountCode {
    pub id: Uuid,
    pub code: String,
    pub is_used: bool,
    pub discount_percent: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Form input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorSubmission {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone: String,
}

impl VisitorSubmission {
    /// Validate raw form fields. Surrounding whitespace is ignored.
    ///
    /// Empty fields are reported before malformed ones, in form order.
    pub fn parse(
        first_name: &str,
        last_name: &str,
        national_id: &str,
        phone: &str,
    ) -> Result<Self, CodepoolError> {
        let fields = [
            (Field::FirstName, first_name.trim()),
            (Field::LastName, last_name.trim()),
            (Field::NationalId, national_id.trim()),
            (Field::Phone, phone.trim()),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| value.is_empty()) {
            return Err(CodepoolError::MissingField(*field));
        }
        let [(_, first_name), (_, last_name), (_, national_id), (_, phone)] = fields;
        if !is_valid_national_id(national_id) {
            return Err(CodepoolError::InvalidField(Field::NationalId));
        }
        if !is_valid_phone(phone) {
            return Err(CodepoolError::InvalidField(Field::Phone));
        }
        Ok(Self {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            national_id: national_id.to_owned(),
            phone: phone.to_owned(),
        })
    }
}

fn all_ascii_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

/// Exactly ten ASCII digits.
pub fn is_valid_national_id(value: &str) -> bool {
    value.len() == NATIONAL_ID_LEN && all_ascii_digits(value)
}

/// Exactly eleven ASCII digits starting with `09`.
pub fn is_valid_phone(value: &str) -> bool {
    value.len() == PHONE_LEN && value.starts_with(PHONE_PREFIX) && all_ascii_digits(value)
}

/// Result of find-or-create on a submission.
#[derive(Debug, Clone)]
pub enum Registration {
    Created(Visitor),
    /// An existing visitor matched; names were refreshed.
    Updated(Visitor),
}

impl Registration {
    pub fn visitor(&self) -> &Visitor {
        match self {
            Self::Created(v) | Self::Updated(v) => v,
        }
    }

    pub fn into_visitor(self) -> Visitor {
        match self {
            Self::Created(v) | Self::Updated(v) => v,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Result of one atomic claim attempt.
#[derive(Debug, Clone)]
pub enum ClaimOutcome {
    /// A free code was marked used and bound to the visitor.
    Claimed { visitor: Visitor, code: DiscountCode },
    /// The visitor already holds a code; nothing changed.
    AlreadyAssigned(Visitor),
    /// No unused code left; nothing changed.
    PoolExhausted(Visitor),
    VisitorMissing,
}

/// Counters reported by a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub added: u64,
    pub duplicates: u64,
}

/// Split operator text into candidate codes: one per line, trimmed, blanks dropped.
pub fn parse_code_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub total_visitors: u64,
    pub visitors_with_code: u64,
    pub total_codes: u64,
    pub used_codes: u64,
}

impl PoolStats {
    pub fn unused_codes(&self) -> u64 {
        self.total_codes.saturating_sub(self.used_codes)
    }
}

/// One consistent read of the admin dashboard.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub stats: PoolStats,
    /// Visitors holding a code, most recently updated first.
    pub holders: Vec<Visitor>,
}
