use platform_db::DbPool;
use sea_orm::TransactionTrait;
use tracing::{info, instrument};

use crate::error::{HrError, HrResult};
use crate::model::{Employee, NewEmployee};
use crate::store::EmployeeStore;

#[derive(Clone, Debug)]
pub struct EmployeeService {
    db: DbPool,
}

impl EmployeeService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    #[instrument(name = "hr.employee.create", skip_all)]
    pub async fn create(&self, employee: NewEmployee) -> HrResult<Employee> {
        let txn = self.db.begin().await?;
        let created = EmployeeStore::add(&txn, employee).await?;
        txn.commit().await?;
        info!(employee_id = %created.employee_id, "employee created");
        Ok(created)
    }

    #[instrument(name = "hr.employee.get", skip(self))]
    pub async fn get_by_id(&self, id: &str) -> HrResult<Option<Employee>> {
        Ok(EmployeeStore::get_by_id(&self.db, id).await?)
    }

    /// Replaces the stored fields and report list. A body id, when present,
    /// must name the same employee as `id`.
    #[instrument(name = "hr.employee.replace", skip(self, employee))]
    pub async fn replace(&self, id: &str, employee: NewEmployee) -> HrResult<Option<Employee>> {
        if let Some(body_id) = employee.employee_id.as_deref().filter(|body| !body.is_empty()) {
            if body_id != id {
                return Err(HrError::EmployeeIdMismatch {
                    path: id.to_string(),
                    body: body_id.to_string(),
                });
            }
        }
        let txn = self.db.begin().await?;
        let replaced = EmployeeStore::replace(&txn, id, employee).await?;
        txn.commit().await?;
        if replaced.is_some() {
            info!("employee replaced");
        }
        Ok(replaced)
    }
}
