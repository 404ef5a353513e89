use migration::{Migrator, MigratorTrait};
use platform_db::DbPool;
use sea_orm::Database;

use crate::{EmployeeRef, NewEmployee};

pub async fn memory_db() -> DbPool {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn new_employee(first_name: &str, reports: &[&str]) -> NewEmployee {
    NewEmployee {
        employee_id: None,
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        position: "Developer".to_string(),
        department: "Engineering".to_string(),
        direct_reports: Some(
            reports
                .iter()
                .map(|id| EmployeeRef {
                    employee_id: id.to_string(),
                })
                .collect(),
        ),
    }
}
