//! Demo employees with fixed ids.

use entity::employee;
use platform_db::DbPool;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, TransactionTrait};
use tracing::info;

use crate::error::HrResult;
use crate::store::EmployeeStore;

pub const JOHN_LENNON: &str = "16a596ae-edd3-4847-99fe-c4518e82c86f";
pub const PAUL_MCCARTNEY: &str = "b7839309-3348-463b-a7e3-5de1c168beb3";
pub const RINGO_STARR: &str = "03aa1462-ffa9-4978-901b-7c001562cf6f";
pub const PETE_BEST: &str = "62c1084e-6e34-4630-93fd-9153afb65309";
pub const GEORGE_HARRISON: &str = "c0c2293d-16bd-4603-8e08-638a9d18b22c";

struct SeedEmployee {
    id: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    position: &'static str,
    reports: &'static [&'static str],
}

const DEPARTMENT: &str = "Engineering";

const EMPLOYEES: [SeedEmployee; 5] = [
    SeedEmployee {
        id: JOHN_LENNON,
        first_name: "John",
        last_name: "Lennon",
        position: "Development Manager",
        reports: &[PAUL_MCCARTNEY, RINGO_STARR],
    },
    SeedEmployee {
        id: PAUL_MCCARTNEY,
        first_name: "Paul",
        last_name: "McCartney",
        position: "Developer I",
        reports: &[],
    },
    SeedEmployee {
        id: RINGO_STARR,
        first_name: "Ringo",
        last_name: "Starr",
        position: "Developer V",
        reports: &[PETE_BEST, GEORGE_HARRISON],
    },
    SeedEmployee {
        id: PETE_BEST,
        first_name: "Pete",
        last_name: "Best",
        position: "Developer II",
        reports: &[],
    },
    SeedEmployee {
        id: GEORGE_HARRISON,
        first_name: "George",
        last_name: "Harrison",
        position: "Developer III",
        reports: &[],
    },
];

/// Inserts the demo employees that are not present yet and returns how many
/// were added. Existing rows and their reports are left untouched.
pub async fn seed_employees(db: &DbPool) -> HrResult<usize> {
    let txn = db.begin().await?;
    let mut inserted = Vec::new();
    for seed in &EMPLOYEES {
        if EmployeeStore::find_record(&txn, seed.id).await?.is_some() {
            continue;
        }
        employee::ActiveModel {
            id: Set(seed.id.to_string()),
            first_name: Set(seed.first_name.to_string()),
            last_name: Set(seed.last_name.to_string()),
            position: Set(seed.position.to_string()),
            department: Set(DEPARTMENT.to_string()),
        }
        .insert(&txn)
        .await?;
        inserted.push(seed);
    }
    for seed in &inserted {
        let reports: Vec<String> = seed.reports.iter().map(|id| id.to_string()).collect();
        EmployeeStore::write_reports(&txn, seed.id, &reports).await?;
    }
    txn.commit().await?;
    info!(inserted = inserted.len(), "demo employees seeded");
    Ok(inserted.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_db;

    #[tokio::test]
    async fn seeding_twice_is_a_no_op() {
        let db = memory_db().await;
        assert_eq!(seed_employees(&db).await.unwrap(), 5);
        assert_eq!(seed_employees(&db).await.unwrap(), 0);

        let john = EmployeeStore::get_by_id(&db, JOHN_LENNON)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(john.position, "Development Manager");
        assert_eq!(john.report_ids(), vec![PAUL_MCCARTNEY, RINGO_STARR]);
    }
}
