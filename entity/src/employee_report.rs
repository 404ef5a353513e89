//! Ordered manager -> direct report edges.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employee_report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub manager_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub report_id: String,
    /// Index of the report within the manager's list.
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::ManagerId",
        to = "super::employee::Column::Id",
        on_delete = "Cascade"
    )]
    Manager,
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::ReportId",
        to = "super::employee::Column::Id",
        on_delete = "Cascade"
    )]
    Report,
}

impl ActiveModelBehavior for ActiveModel {}
