use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use codepool::domain::repository::{
    AdminRepository, CodePoolRepository, CredentialHasher, VisitorRepository,
};
use codepool::domain::types::{
    Admin, ClaimOutcome, Dashboard, DiscountCode, ImportReport, PoolStats, Registration,
    Visitor, VisitorSubmission,
};
use codepool::error::CodepoolError;
use codepool::usecase::allocation::{SubmitVisitorInput, SubmitVisitorUseCase};

pub const TEST_SESSION_SECRET: &str = "integration-session-secret-0123456789";

// ── Shared in-memory store ───────────────────────────────────────────────────

/// Visitors and codes behind one lock, so a claim is atomic like the
/// database transaction it stands in for.
#[derive(Default)]
pub struct Store {
    pub visitors: Vec<Visitor>,
    pub codes: Vec<DiscountCode>,
}

pub type SharedStore = Arc<Mutex<Store>>;

pub fn store_with_codes(codes: &[&str]) -> SharedStore {
    let base = Utc::now() - Duration::minutes(10);
    let codes = codes
        .iter()
        .enumerate()
        .map(|(i, code)| test_code(code, base + Duration::seconds(i as i64)))
        .collect();
    Arc::new(Mutex::new(Store {
        visitors: vec![],
        codes,
    }))
}

pub fn test_code(code: &str, created_at: chrono::DateTime<Utc>) -> DiscountCode {
    DiscountCode {
        id: Uuid::now_v7(),
        code: code.to_owned(),
        is_used: false,
        discount_percent: 32,
        created_at,
    }
}

pub fn used_count(store: &SharedStore) -> usize {
    store.lock().unwrap().codes.iter().filter(|c| c.is_used).count()
}

pub fn visitor_count(store: &SharedStore) -> usize {
    store.lock().unwrap().visitors.len()
}

// ── MockVisitorRepo ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockVisitorRepo {
    pub store: SharedStore,
    /// Number of upcoming `register` calls that report a lost insert race.
    pub pending_conflicts: Arc<Mutex<u32>>,
}

impl MockVisitorRepo {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            pending_conflicts: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_conflicts(store: SharedStore, conflicts: u32) -> Self {
        Self {
            store,
            pending_conflicts: Arc::new(Mutex::new(conflicts)),
        }
    }
}

impl VisitorRepository for MockVisitorRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Visitor>, CodepoolError> {
        let store = self.store.lock().unwrap();
        Ok(store.visitors.iter().find(|v| v.id == id).cloned())
    }

    async fn register(
        &self,
        submission: &VisitorSubmission,
    ) -> Result<Registration, CodepoolError> {
        {
            let mut pending = self.pending_conflicts.lock().unwrap();
            if *pending > 0 {
                *pending -= 1;
                return Err(CodepoolError::Conflict);
            }
        }

        let mut store = self.store.lock().unwrap();
        let matches: Vec<usize> = store
            .visitors
            .iter()
            .enumerate()
            .filter(|(_, v)| v.national_id == submission.national_id || v.phone == submission.phone)
            .map(|(i, _)| i)
            .collect();
        let now = Utc::now();
        match matches.as_slice() {
            [] => {
                let visitor = Visitor {
                    id: Uuid::now_v7(),
                    first_name: submission.first_name.clone(),
                    last_name: submission.last_name.clone(),
                    national_id: submission.national_id.clone(),
                    phone: submission.phone.clone(),
                    discount_code: None,
                    created_at: now,
                    updated_at: now,
                };
                store.visitors.push(visitor.clone());
                Ok(Registration::Created(visitor))
            }
            [i] => {
                let visitor = &mut store.visitors[*i];
                visitor.first_name = submission.first_name.clone();
                visitor.last_name = submission.last_name.clone();
                visitor.updated_at = now;
                Ok(Registration::Updated(visitor.clone()))
            }
            _ => Err(CodepoolError::ConflictingIdentity),
        }
    }

    async fn claim_code(&self, visitor_id: Uuid) -> Result<ClaimOutcome, CodepoolError> {
        let mut store = self.store.lock().unwrap();
        let Some(vi) = store.visitors.iter().position(|v| v.id == visitor_id) else {
            return Ok(ClaimOutcome::VisitorMissing);
        };
        if store.visitors[vi].discount_code.is_some() {
            return Ok(ClaimOutcome::AlreadyAssigned(store.visitors[vi].clone()));
        }
        let Some(ci) = store
            .codes
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_used)
            .min_by_key(|(_, c)| (c.created_at, c.id))
            .map(|(i, _)| i)
        else {
            return Ok(ClaimOutcome::PoolExhausted(store.visitors[vi].clone()));
        };
        store.codes[ci].is_used = true;
        let code = store.codes[ci].clone();
        let visitor = &mut store.visitors[vi];
        visitor.discount_code = Some(code.code.clone());
        visitor.updated_at = Utc::now();
        Ok(ClaimOutcome::Claimed {
            visitor: visitor.clone(),
            code,
        })
    }
}

// ── MockCodePool ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockCodePool {
    pub store: SharedStore,
}

impl MockCodePool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn insert(store: &mut Store, code: &str, discount_percent: i32) -> bool {
        if store.codes.iter().any(|c| c.code == code) {
            return false;
        }
        let mut new = test_code(code, Utc::now());
        new.discount_percent = discount_percent;
        store.codes.push(new);
        true
    }
}

impl CodePoolRepository for MockCodePool {
    async fn import(
        &self,
        codes: &[String],
        discount_percent: i32,
    ) -> Result<ImportReport, CodepoolError> {
        let mut store = self.store.lock().unwrap();
        let mut report = ImportReport::default();
        for code in codes {
            if Self::insert(&mut store, code, discount_percent) {
                report.added += 1;
            } else {
                report.duplicates += 1;
            }
        }
        Ok(report)
    }

    async fn seed_if_empty(
        &self,
        codes: &[&str],
        discount_percent: i32,
    ) -> Result<u64, CodepoolError> {
        let mut store = self.store.lock().unwrap();
        if !store.codes.is_empty() {
            return Ok(0);
        }
        let mut added = 0;
        for code in codes {
            if Self::insert(&mut store, code, discount_percent) {
                added += 1;
            }
        }
        Ok(added)
    }

    async fn list(&self) -> Result<Vec<DiscountCode>, CodepoolError> {
        let mut codes = self.store.lock().unwrap().codes.clone();
        codes.sort_by_key(|c| (c.is_used, c.created_at, c.id));
        Ok(codes)
    }

    async fn dashboard(&self) -> Result<Dashboard, CodepoolError> {
        let store = self.store.lock().unwrap();
        let mut holders: Vec<Visitor> = store
            .visitors
            .iter()
            .filter(|v| v.discount_code.is_some())
            .cloned()
            .collect();
        holders.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(Dashboard {
            stats: PoolStats {
                total_visitors: store.visitors.len() as u64,
                visitors_with_code: holders.len() as u64,
                total_codes: store.codes.len() as u64,
                used_codes: store.codes.iter().filter(|c| c.is_used).count() as u64,
            },
            holders,
        })
    }
}

// ── MockAdminRepo / MockHasher ───────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockAdminRepo {
    pub admins: Arc<Mutex<Vec<Admin>>>,
}

impl MockAdminRepo {
    pub fn new(admins: Vec<Admin>) -> Self {
        Self {
            admins: Arc::new(Mutex::new(admins)),
        }
    }
}

impl AdminRepository for MockAdminRepo {
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, CodepoolError> {
        let admins = self.admins.lock().unwrap();
        Ok(admins.iter().find(|a| a.username == username).cloned())
    }

    async fn create_if_none(&self, admin: &Admin) -> Result<bool, CodepoolError> {
        let mut admins = self.admins.lock().unwrap();
        if !admins.is_empty() {
            return Ok(false);
        }
        admins.push(admin.clone());
        Ok(true)
    }
}

/// Reversible stand-in for argon2 so tests stay fast.
#[derive(Clone, Copy, Default)]
pub struct MockHasher;

impl CredentialHasher for MockHasher {
    fn hash(&self, password: &str) -> Result<String, CodepoolError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, password_hash: &str) -> bool {
        password_hash.strip_prefix("plain$") == Some(password)
    }
}

pub fn test_admin(username: &str, password: &str) -> Admin {
    Admin {
        id: Uuid::now_v7(),
        username: username.to_owned(),
        password_hash: MockHasher.hash(password).unwrap(),
        created_at: Utc::now(),
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn form(first: &str, last: &str, national_id: &str, phone: &str) -> SubmitVisitorInput {
    SubmitVisitorInput {
        first_name: first.to_owned(),
        last_name: last.to_owned(),
        national_id: national_id.to_owned(),
        phone: phone.to_owned(),
    }
}

/// A valid submission for the `n`-th distinct visitor.
pub fn nth_form(n: usize) -> SubmitVisitorInput {
    form(
        "Sara",
        "Ahmadi",
        &format!("{:010}", 1_000_000 + n),
        &format!("0912{:07}", n),
    )
}

pub fn submit_usecase(store: &SharedStore) -> SubmitVisitorUseCase<MockVisitorRepo> {
    SubmitVisitorUseCase {
        visitors: MockVisitorRepo::new(Arc::clone(store)),
    }
}
