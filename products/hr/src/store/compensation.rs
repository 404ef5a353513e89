use entity::compensation;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    ModelTrait, QueryFilter,
};
use uuid::Uuid;

use crate::model::Compensation;

pub struct CompensationStore;

impl CompensationStore {
    pub async fn get_by_id<C>(
        db: &C,
        employee_id: &str,
    ) -> Result<Option<compensation::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        compensation::Entity::find()
            .filter(compensation::Column::EmployeeId.eq(employee_id))
            .one(db)
            .await
    }

    /// Inserts under a fresh surrogate key. Fails on a unique-index violation
    /// when the employee already has a record.
    pub async fn add<C>(db: &C, compensation: &Compensation) -> Result<compensation::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        compensation::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(compensation.employee_id.clone()),
            salary: Set(compensation.salary),
            effective_date: Set(compensation.effective_date.into()),
        }
        .insert(db)
        .await
    }

    pub async fn remove<C>(db: &C, record: compensation::Model) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        record.delete(db).await?;
        Ok(())
    }
}
