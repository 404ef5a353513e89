use platform_db::DbPool;
use sea_orm::TransactionTrait;
use tracing::{debug, info, instrument, warn};

use crate::error::HrResult;
use crate::model::{Compensation, Upserted};
use crate::store::{CompensationStore, EmployeeStore};

#[derive(Clone, Debug)]
pub struct CompensationService {
    db: DbPool,
}

impl CompensationService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    #[instrument(name = "hr.compensation.get", skip(self))]
    pub async fn get_by_id(&self, id: &str) -> HrResult<Option<Compensation>> {
        if id.is_empty() {
            return Ok(None);
        }
        let record = CompensationStore::get_by_id(&self.db, id).await?;
        Ok(record.map(Compensation::from))
    }

    /// Creates or replaces the employee's compensation in one transaction.
    ///
    /// Returns `None` when the employee does not exist; nothing is written in
    /// that case. A replace removes the old row and inserts the new one, so
    /// readers never observe the employee without a record.
    #[instrument(
        name = "hr.compensation.upsert",
        skip_all,
        fields(employee_id = %compensation.employee_id)
    )]
    pub async fn upsert(&self, compensation: Compensation) -> HrResult<Option<Upserted>> {
        let txn = self.db.begin().await?;

        // Writers for one employee queue here; the last to commit wins.
        if EmployeeStore::lock_record(&txn, &compensation.employee_id)
            .await?
            .is_none()
        {
            warn!("compensation rejected: employee does not exist");
            txn.rollback().await?;
            return Ok(None);
        }

        let outcome = match CompensationStore::get_by_id(&txn, &compensation.employee_id).await? {
            None => {
                debug!("no compensation on file, creating");
                let stored = CompensationStore::add(&txn, &compensation).await?;
                Upserted::Created(stored.into())
            }
            Some(existing) => {
                debug!("replacing existing compensation");
                CompensationStore::remove(&txn, existing).await?;
                let stored = CompensationStore::add(&txn, &compensation).await?;
                Upserted::Replaced(stored.into())
            }
        };

        txn.commit().await?;
        info!(created = outcome.is_created(), "compensation stored");
        Ok(Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_db, new_employee};
    use crate::{Employee, EmployeeStore};
    use chrono::{TimeZone, Utc};
    use entity::compensation;
    use rust_decimal::Decimal;
    use sea_orm::{EntityTrait, PaginatorTrait};

    async fn setup() -> (CompensationService, DbPool, Employee) {
        let db = memory_db().await;
        let paul = EmployeeStore::add(&db, new_employee("Paul", &[])).await.unwrap();
        (CompensationService::new(db.clone()), db, paul)
    }

    fn comp(employee_id: &str, cents: i64, day: u32) -> Compensation {
        Compensation {
            employee_id: employee_id.to_string(),
            salary: Decimal::new(cents, 2),
            effective_date: Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn first_upsert_creates() {
        let (service, _db, paul) = setup().await;
        let input = comp(&paul.employee_id, 350, 1);

        let outcome = service.upsert(input.clone()).await.unwrap().unwrap();
        assert!(outcome.is_created());
        assert_eq!(outcome.compensation(), &input);

        let stored = service.get_by_id(&paul.employee_id).await.unwrap().unwrap();
        assert_eq!(stored, input);
    }

    #[tokio::test]
    async fn second_upsert_replaces_old_values() {
        let (service, db, paul) = setup().await;
        service
            .upsert(comp(&paul.employee_id, 350, 1))
            .await
            .unwrap()
            .unwrap();

        let updated = comp(&paul.employee_id, 1_000_000, 2);
        let outcome = service.upsert(updated.clone()).await.unwrap().unwrap();
        assert!(!outcome.is_created());
        assert_eq!(outcome.into_compensation(), updated);

        let stored = service.get_by_id(&paul.employee_id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
        let rows = compensation::Entity::find().count(&db).await.unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn repeated_identical_upsert_is_stable() {
        let (service, _db, paul) = setup().await;
        let input = comp(&paul.employee_id, 4_200_000, 3);
        service.upsert(input.clone()).await.unwrap();
        service.upsert(input.clone()).await.unwrap();
        assert_eq!(
            service.get_by_id(&paul.employee_id).await.unwrap(),
            Some(input)
        );
    }

    #[tokio::test]
    async fn unknown_employee_is_not_found_on_create() {
        let (service, db, _paul) = setup().await;
        let outcome = service.upsert(comp("Balderdash", 350, 1)).await.unwrap();
        assert!(outcome.is_none());
        let rows = compensation::Entity::find().count(&db).await.unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn removed_employee_is_not_found_on_replace() {
        let (service, db, paul) = setup().await;
        service
            .upsert(comp(&paul.employee_id, 350, 1))
            .await
            .unwrap()
            .unwrap();

        EmployeeStore::remove(&db, &paul.employee_id).await.unwrap();

        let outcome = service
            .upsert(comp(&paul.employee_id, 700, 2))
            .await
            .unwrap();
        assert!(outcome.is_none());
        assert!(service.get_by_id(&paul.employee_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_or_unknown_id_reads_nothing() {
        let (service, _db, _paul) = setup().await;
        assert!(service.get_by_id("").await.unwrap().is_none());
        assert!(service.get_by_id("FakeGuid").await.unwrap().is_none());
    }
}
