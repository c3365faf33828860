use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Visitors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Visitors::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Visitors::FirstName).text().not_null())
                    .col(ColumnDef::new(Visitors::LastName).text().not_null())
                    .col(
                        ColumnDef::new(Visitors::NationalId)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Visitors::Phone)
                            .string_len(11)
                            .not_null()
                            .unique_key(),
                    )
                    // Unique but nullable: many visitors without a code, at most
                    // one visitor per code.
                    .col(ColumnDef::new(Visitors::DiscountCode).text().unique_key())
                    .col(
                        ColumnDef::new(Visitors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Visitors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Visitors::Table, Visitors::DiscountCode)
                            .to(DiscountCodes::Table, DiscountCodes::Code)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Visitors::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Visitors {
    Table,
    Id,
    FirstName,
    LastName,
    NationalId,
    Phone,
    DiscountCode,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DiscountCodes {
    Table,
    Code,
}
