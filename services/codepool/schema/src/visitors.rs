use sea_orm::entity::prelude::*;

/// A person who submitted the public form.
///
/// Identified by either `national_id` or `phone`; `discount_code` is set once
/// by a claim and never cleared.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "visitors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub first_name: String,
    #[sea_orm(column_type = "Text")]
    pub last_name: String,
    #[sea_orm(unique)]
    pub national_id: String,
    #[sea_orm(unique)]
    pub phone: String,
    #[sea_orm(unique, column_type = "Text", nullable)]
    pub discount_code: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::discount_codes::Entity",
        from = "Column::DiscountCode",
        to = "super::discount_codes::Column::Code"
    )]
    DiscountCodes,
}

impl Related<super::discount_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiscountCodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
