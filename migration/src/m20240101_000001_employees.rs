use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employee::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employee::FirstName).string().not_null())
                    .col(ColumnDef::new(Employee::LastName).string().not_null())
                    .col(ColumnDef::new(Employee::Position).string().not_null())
                    .col(ColumnDef::new(Employee::Department).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmployeeReport::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeeReport::ManagerId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeReport::ReportId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(EmployeeReport::Position).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(EmployeeReport::ManagerId)
                            .col(EmployeeReport::ReportId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_report_manager")
                            .from(EmployeeReport::Table, EmployeeReport::ManagerId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_report_report")
                            .from(EmployeeReport::Table, EmployeeReport::ReportId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employee_report_report")
                    .table(EmployeeReport::Table)
                    .col(EmployeeReport::ReportId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmployeeReport::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employee::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Employee {
    Table,
    Id,
    FirstName,
    LastName,
    Position,
    Department,
}

#[derive(DeriveIden)]
enum EmployeeReport {
    Table,
    ManagerId,
    ReportId,
    Position,
}
