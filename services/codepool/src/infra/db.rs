use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    AccessMode, ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel as _, IsolationLevel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionError, TransactionTrait,
    sea_query::OnConflict,
};
use uuid::Uuid;

use codepool_core::sea_ext::{ClaimFirst, is_unique_violation};
use codepool_schema::{admins, discount_codes, visitors};

use crate::domain::repository::{AdminRepository, CodePoolRepository, VisitorRepository};
use crate::domain::types::{
    Admin, ClaimOutcome, Dashboard, DiscountCode, ImportReport, PoolStats, Registration, Visitor,
    VisitorSubmission,
};
use crate::error::CodepoolError;

// ── Visitor repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVisitorRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, thiserror::Error)]
enum RegisterError {
    #[error(transparent)]
    Db(#[from] DbErr),
    #[error("national id and phone match different visitors")]
    SplitIdentity,
}

impl VisitorRepository for DbVisitorRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Visitor>, CodepoolError> {
        let model = visitors::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find visitor by id")?;
        Ok(model.map(visitor_from_model))
    }

    async fn register(
        &self,
        submission: &VisitorSubmission,
    ) -> Result<Registration, CodepoolError> {
        self.db
            .transaction::<_, Registration, RegisterError>(|txn| {
                let submission = submission.clone();
                Box::pin(async move { register_in(txn, submission).await })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Transaction(RegisterError::SplitIdentity) => {
                    CodepoolError::ConflictingIdentity
                }
                TransactionError::Transaction(RegisterError::Db(ref err))
                | TransactionError::Connection(ref err)
                    if is_unique_violation(err) =>
                {
                    CodepoolError::Conflict
                }
                other => anyhow::Error::new(other).context("register visitor").into(),
            })
    }

    async fn claim_code(&self, visitor_id: Uuid) -> Result<ClaimOutcome, CodepoolError> {
        let outcome = self
            .db
            .transaction::<_, ClaimOutcome, DbErr>(|txn| {
                Box::pin(async move { claim_in(txn, visitor_id).await })
            })
            .await;
        match outcome {
            Ok(outcome) => Ok(outcome),
            // The unique binding on visitors.discount_code refused a second
            // holder; nothing was committed.
            Err(TransactionError::Transaction(ref err)) if is_unique_violation(err) => {
                Err(CodepoolError::Conflict)
            }
            Err(e) => Err(anyhow::Error::new(e).context("claim discount code").into()),
        }
    }
}

async fn register_in(
    txn: &DatabaseTransaction,
    submission: VisitorSubmission,
) -> Result<Registration, RegisterError> {
    // Lock matching rows so a concurrent claim or rename waits for us.
    let matches = visitors::Entity::find()
        .filter(
            Condition::any()
                .add(visitors::Column::NationalId.eq(submission.national_id.as_str()))
                .add(visitors::Column::Phone.eq(submission.phone.as_str())),
        )
        .lock_exclusive()
        .all(txn)
        .await?;

    let now = Utc::now();
    match matches.as_slice() {
        [] => {
            let model = visitors::ActiveModel {
                id: Set(Uuid::now_v7()),
                first_name: Set(submission.first_name),
                last_name: Set(submission.last_name),
                national_id: Set(submission.national_id),
                phone: Set(submission.phone),
                discount_code: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(txn)
            .await?;
            Ok(Registration::Created(visitor_from_model(model)))
        }
        [existing] => {
            let mut am = existing.clone().into_active_model();
            am.first_name = Set(submission.first_name);
            am.last_name = Set(submission.last_name);
            am.updated_at = Set(now);
            let model = am.update(txn).await?;
            Ok(Registration::Updated(visitor_from_model(model)))
        }
        _ => Err(RegisterError::SplitIdentity),
    }
}

async fn claim_in(txn: &DatabaseTransaction, visitor_id: Uuid) -> Result<ClaimOutcome, DbErr> {
    // Serialises claims for the same visitor (double submit).
    let Some(visitor) = visitors::Entity::find_by_id(visitor_id)
        .lock_exclusive()
        .one(txn)
        .await?
    else {
        return Ok(ClaimOutcome::VisitorMissing);
    };
    if visitor.discount_code.is_some() {
        return Ok(ClaimOutcome::AlreadyAssigned(visitor_from_model(visitor)));
    }

    let Some(code) = discount_codes::Entity::find()
        .filter(discount_codes::Column::IsUsed.eq(false))
        .order_by_asc(discount_codes::Column::CreatedAt)
        .order_by_asc(discount_codes::Column::Id)
        .claim_first()
        .one(txn)
        .await?
    else {
        return Ok(ClaimOutcome::PoolExhausted(visitor_from_model(visitor)));
    };

    let mut code_am = code.into_active_model();
    code_am.is_used = Set(true);
    let code = code_am.update(txn).await?;

    let mut visitor_am = visitor.into_active_model();
    visitor_am.discount_code = Set(Some(code.code.clone()));
    visitor_am.updated_at = Set(Utc::now());
    let visitor = visitor_am.update(txn).await?;

    Ok(ClaimOutcome::Claimed {
        visitor: visitor_from_model(visitor),
        code: code_from_model(code),
    })
}

fn visitor_from_model(model: visitors::Model) -> Visitor {
    Visitor {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        national_id: model.national_id,
        phone: model.phone,
        discount_code: model.discount_code,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Code pool repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCodePoolRepository {
    pub db: DatabaseConnection,
}

impl CodePoolRepository for DbCodePoolRepository {
    async fn import(
        &self,
        codes: &[String],
        discount_percent: i32,
    ) -> Result<ImportReport, CodepoolError> {
        let report = self
            .db
            .transaction::<_, ImportReport, DbErr>(|txn| {
                let codes = codes.to_vec();
                Box::pin(async move {
                    let mut report = ImportReport::default();
                    for code in codes {
                        if insert_code(txn, code, discount_percent).await? {
                            report.added += 1;
                        } else {
                            report.duplicates += 1;
                        }
                    }
                    Ok(report)
                })
            })
            .await
            .context("import discount codes")?;
        Ok(report)
    }

    async fn seed_if_empty(
        &self,
        codes: &[&str],
        discount_percent: i32,
    ) -> Result<u64, CodepoolError> {
        let added = self
            .db
            .transaction::<_, u64, DbErr>(|txn| {
                let codes: Vec<String> = codes.iter().map(|c| (*c).to_owned()).collect();
                Box::pin(async move {
                    if discount_codes::Entity::find().count(txn).await? > 0 {
                        return Ok(0);
                    }
                    let mut added = 0;
                    for code in codes {
                        if insert_code(txn, code, discount_percent).await? {
                            added += 1;
                        }
                    }
                    Ok(added)
                })
            })
            .await
            .context("seed discount codes")?;
        Ok(added)
    }

    async fn list(&self) -> Result<Vec<DiscountCode>, CodepoolError> {
        let models = discount_codes::Entity::find()
            .order_by_asc(discount_codes::Column::IsUsed)
            .order_by_asc(discount_codes::Column::CreatedAt)
            .order_by_asc(discount_codes::Column::Id)
            .all(&self.db)
            .await
            .context("list discount codes")?;
        Ok(models.into_iter().map(code_from_model).collect())
    }

    async fn dashboard(&self) -> Result<Dashboard, CodepoolError> {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await
            .context("begin dashboard snapshot")?;

        let total_visitors = visitors::Entity::find()
            .count(&txn)
            .await
            .context("count visitors")?;
        let holders = visitors::Entity::find()
            .filter(visitors::Column::DiscountCode.is_not_null())
            .order_by_desc(visitors::Column::UpdatedAt)
            .all(&txn)
            .await
            .context("list code holders")?;
        let total_codes = discount_codes::Entity::find()
            .count(&txn)
            .await
            .context("count codes")?;
        let used_codes = discount_codes::Entity::find()
            .filter(discount_codes::Column::IsUsed.eq(true))
            .count(&txn)
            .await
            .context("count used codes")?;

        txn.commit().await.context("end dashboard snapshot")?;

        Ok(Dashboard {
            stats: PoolStats {
                total_visitors,
                visitors_with_code: holders.len() as u64,
                total_codes,
                used_codes,
            },
            holders: holders.into_iter().map(visitor_from_model).collect(),
        })
    }
}

/// Insert an unused code; `false` when the value already exists.
async fn insert_code(
    txn: &DatabaseTransaction,
    code: String,
    discount_percent: i32,
) -> Result<bool, DbErr> {
    let rows = discount_codes::Entity::insert(discount_codes::ActiveModel {
        id: Set(Uuid::now_v7()),
        code: Set(code),
        is_used: Set(false),
        discount_percent: Set(discount_percent),
        created_at: Set(Utc::now()),
    })
    .on_conflict(
        OnConflict::column(discount_codes::Column::Code)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(txn)
    .await?;
    Ok(rows > 0)
}

fn code_from_model(model: discount_codes::Model) -> DiscountCode {
    DiscountCode {
        id: model.id,
        code: model.code,
        is_used: model.is_used,
        discount_percent: model.discount_percent,
        created_at: model.created_at,
    }
}

// ── Admin repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAdminRepository {
    pub db: DatabaseConnection,
}

impl AdminRepository for DbAdminRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, CodepoolError> {
        let model = admins::Entity::find()
            .filter(admins::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find admin by username")?;
        Ok(model.map(admin_from_model))
    }

    async fn create_if_none(&self, admin: &Admin) -> Result<bool, CodepoolError> {
        let created = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                let admin = admin.clone();
                Box::pin(async move {
                    if admins::Entity::find().count(txn).await? > 0 {
                        return Ok(false);
                    }
                    let rows = admins::Entity::insert(admins::ActiveModel {
                        id: Set(admin.id),
                        username: Set(admin.username),
                        password_hash: Set(admin.password_hash),
                        created_at: Set(admin.created_at),
                    })
                    .on_conflict(
                        OnConflict::column(admins::Column::Username)
                            .do_nothing()
                            .to_owned(),
                    )
                    .exec_without_returning(txn)
                    .await?;
                    Ok(rows > 0)
                })
            })
            .await
            .context("create default admin")?;
        Ok(created)
    }
}

fn admin_from_model(model: admins::Model) -> Admin {
    Admin {
        id: model.id,
        username: model.username,
        password_hash: model.password_hash,
        created_at: model.created_at,
    }
}
