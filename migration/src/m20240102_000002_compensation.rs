use sea_orm_migration::prelude::*;

use crate::m20240101_000001_employees::Employee;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Compensation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Compensation::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Compensation::EmployeeId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Compensation::Salary)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Compensation::EffectiveDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_compensation_employee")
                            .from(Compensation::Table, Compensation::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One compensation per employee; upsert replaces inside a transaction.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_compensation_employee")
                    .table(Compensation::Table)
                    .col(Compensation::EmployeeId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Compensation::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Compensation {
    Table,
    Id,
    EmployeeId,
    Salary,
    EffectiveDate,
}
