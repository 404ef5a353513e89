use std::collections::HashMap;

use entity::{employee, employee_report};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, DbBackend, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::error::{HrError, HrResult};
use crate::model::{Employee, NewEmployee};

pub struct EmployeeStore;

impl EmployeeStore {
    pub async fn find_record<C>(db: &C, id: &str) -> Result<Option<employee::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        employee::Entity::find_by_id(id.to_owned()).one(db).await
    }

    /// Same as `find_record`, holding a row lock until the surrounding
    /// transaction ends. SQLite has no row locks; its writers already
    /// serialize on the database lock.
    pub async fn lock_record<C>(db: &C, id: &str) -> Result<Option<employee::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let query = employee::Entity::find_by_id(id.to_owned());
        match db.get_database_backend() {
            DbBackend::Sqlite => query.one(db).await,
            _ => query.lock_exclusive().one(db).await,
        }
    }

    /// Unordered batch lookup; unknown ids are skipped.
    pub async fn find_records<C>(db: &C, ids: &[String]) -> Result<Vec<employee::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        employee::Entity::find()
            .filter(employee::Column::Id.is_in(ids.iter().cloned()))
            .all(db)
            .await
    }

    /// Direct report ids for each manager, in stored order. Managers without
    /// reports have no entry.
    pub async fn report_ids<C>(
        db: &C,
        manager_ids: &[String],
    ) -> Result<HashMap<String, Vec<String>>, DbErr>
    where
        C: ConnectionTrait,
    {
        if manager_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let edges = employee_report::Entity::find()
            .filter(employee_report::Column::ManagerId.is_in(manager_ids.iter().cloned()))
            .order_by_asc(employee_report::Column::ManagerId)
            .order_by_asc(employee_report::Column::Position)
            .all(db)
            .await?;
        let mut reports: HashMap<String, Vec<String>> = HashMap::new();
        for edge in edges {
            reports
                .entry(edge.manager_id)
                .or_default()
                .push(edge.report_id);
        }
        Ok(reports)
    }

    /// Employee with its immediate reports materialized; the reports' own
    /// reports are left unloaded.
    pub async fn get_by_id<C>(db: &C, id: &str) -> Result<Option<Employee>, DbErr>
    where
        C: ConnectionTrait,
    {
        let Some(record) = Self::find_record(db, id).await? else {
            return Ok(None);
        };
        let ids = Self::report_ids(db, std::slice::from_ref(&record.id))
            .await?
            .remove(&record.id)
            .unwrap_or_default();
        let mut by_id = Self::records_by_id(db, &ids).await?;
        let reports = ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(Employee::from)
            .collect();
        Ok(Some(Employee::with_reports(record, reports)))
    }

    /// Inserts a new employee under a generated id. Every report id must
    /// resolve, otherwise nothing is written.
    pub async fn add<C>(db: &C, employee: NewEmployee) -> HrResult<Employee>
    where
        C: ConnectionTrait,
    {
        let report_ids = employee.report_ids();
        let reports = Self::resolve_reports(db, &report_ids).await?;
        let record = employee::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            first_name: Set(employee.first_name),
            last_name: Set(employee.last_name),
            position: Set(employee.position),
            department: Set(employee.department),
        }
        .insert(db)
        .await?;
        Self::write_reports(db, &record.id, &report_ids).await?;
        Ok(Employee::with_reports(record, reports))
    }

    /// Overwrites fields and report list of an existing employee.
    pub async fn replace<C>(db: &C, id: &str, employee: NewEmployee) -> HrResult<Option<Employee>>
    where
        C: ConnectionTrait,
    {
        let Some(existing) = Self::find_record(db, id).await? else {
            return Ok(None);
        };
        let report_ids = employee.report_ids();
        let reports = Self::resolve_reports(db, &report_ids).await?;

        let mut active: employee::ActiveModel = existing.into();
        active.first_name = Set(employee.first_name);
        active.last_name = Set(employee.last_name);
        active.position = Set(employee.position);
        active.department = Set(employee.department);
        let record = active.update(db).await?;

        employee_report::Entity::delete_many()
            .filter(employee_report::Column::ManagerId.eq(id))
            .exec(db)
            .await?;
        Self::write_reports(db, &record.id, &report_ids).await?;
        Ok(Some(Employee::with_reports(record, reports)))
    }

    /// Deletes the employee and every edge touching it. Compensation rows
    /// cascade at the database level.
    pub async fn remove<C>(db: &C, id: &str) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        employee_report::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(employee_report::Column::ManagerId.eq(id))
                    .add(employee_report::Column::ReportId.eq(id)),
            )
            .exec(db)
            .await?;
        let result = employee::Entity::delete_by_id(id.to_owned())
            .exec(db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub(crate) async fn write_reports<C>(
        db: &C,
        manager_id: &str,
        report_ids: &[String],
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        if report_ids.is_empty() {
            return Ok(());
        }
        let edges = report_ids
            .iter()
            .enumerate()
            .map(|(position, report_id)| employee_report::ActiveModel {
                manager_id: Set(manager_id.to_owned()),
                report_id: Set(report_id.clone()),
                position: Set(position as i32),
            });
        employee_report::Entity::insert_many(edges)
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    async fn records_by_id<C>(
        db: &C,
        ids: &[String],
    ) -> Result<HashMap<String, employee::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(Self::find_records(db, ids)
            .await?
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect())
    }

    async fn resolve_reports<C>(db: &C, ids: &[String]) -> HrResult<Vec<Employee>>
    where
        C: ConnectionTrait,
    {
        let mut by_id = Self::records_by_id(db, ids).await?;
        ids.iter()
            .map(|id| {
                by_id
                    .remove(id)
                    .map(Employee::from)
                    .ok_or_else(|| HrError::UnknownReport(id.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_db, new_employee};

    #[tokio::test]
    async fn add_assigns_id_and_resolves_reports_in_order() {
        let db = memory_db().await;
        let paul = EmployeeStore::add(&db, new_employee("Paul", &[])).await.unwrap();
        let ringo = EmployeeStore::add(&db, new_employee("Ringo", &[])).await.unwrap();
        let john = EmployeeStore::add(
            &db,
            new_employee("John", &[ringo.employee_id.as_str(), paul.employee_id.as_str()]),
        )
        .await
        .unwrap();

        assert!(Uuid::parse_str(&john.employee_id).is_ok());
        assert_ne!(john.employee_id, paul.employee_id);
        assert_eq!(
            john.report_ids(),
            vec![ringo.employee_id.as_str(), paul.employee_id.as_str()]
        );
        let reports = john.direct_reports.as_ref().unwrap();
        assert_eq!(reports[0].first_name, "Ringo");
    }

    #[tokio::test]
    async fn add_with_unknown_report_writes_nothing() {
        let db = memory_db().await;
        let err = EmployeeStore::add(&db, new_employee("John", &["ghost"]))
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::UnknownReport(ref id) if id == "ghost"));
        let all = employee::Entity::find().all(&db).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn get_by_id_loads_one_level() {
        let db = memory_db().await;
        let pete = EmployeeStore::add(&db, new_employee("Pete", &[])).await.unwrap();
        let ringo = EmployeeStore::add(&db, new_employee("Ringo", &[pete.employee_id.as_str()]))
            .await
            .unwrap();
        let john = EmployeeStore::add(&db, new_employee("John", &[ringo.employee_id.as_str()]))
            .await
            .unwrap();

        let loaded = EmployeeStore::get_by_id(&db, &john.employee_id)
            .await
            .unwrap()
            .unwrap();
        let reports = loaded.direct_reports.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].employee_id, ringo.employee_id);
        assert_eq!(reports[0].direct_reports, None);

        let leaf = EmployeeStore::get_by_id(&db, &pete.employee_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(leaf.direct_reports, Some(Vec::new()));

        assert!(EmployeeStore::get_by_id(&db, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn replace_overwrites_fields_and_reports() {
        let db = memory_db().await;
        let paul = EmployeeStore::add(&db, new_employee("Paul", &[])).await.unwrap();
        let george = EmployeeStore::add(&db, new_employee("George", &[])).await.unwrap();
        let john = EmployeeStore::add(&db, new_employee("John", &[paul.employee_id.as_str()]))
            .await
            .unwrap();

        let mut update = new_employee("Johnny", &[george.employee_id.as_str()]);
        update.position = "Director".into();
        let replaced = EmployeeStore::replace(&db, &john.employee_id, update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.employee_id, john.employee_id);
        assert_eq!(replaced.first_name, "Johnny");

        let loaded = EmployeeStore::get_by_id(&db, &john.employee_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.position, "Director");
        assert_eq!(loaded.report_ids(), vec![george.employee_id.as_str()]);

        let missing = EmployeeStore::replace(&db, "missing", new_employee("X", &[]))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn lock_record_reads_inside_a_transaction() {
        use sea_orm::TransactionTrait;

        let db = memory_db().await;
        let paul = EmployeeStore::add(&db, new_employee("Paul", &[])).await.unwrap();

        let txn = db.begin().await.unwrap();
        let locked = EmployeeStore::lock_record(&txn, &paul.employee_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(locked.first_name, "Paul");
        assert!(EmployeeStore::lock_record(&txn, "missing").await.unwrap().is_none());
        txn.commit().await.unwrap();
    }

    #[tokio::test]
    async fn remove_drops_edges_on_both_sides() {
        let db = memory_db().await;
        let paul = EmployeeStore::add(&db, new_employee("Paul", &[])).await.unwrap();
        let john = EmployeeStore::add(&db, new_employee("John", &[paul.employee_id.as_str()]))
            .await
            .unwrap();

        assert!(EmployeeStore::remove(&db, &paul.employee_id).await.unwrap());
        assert!(!EmployeeStore::remove(&db, &paul.employee_id).await.unwrap());

        let edges = EmployeeStore::report_ids(&db, &[john.employee_id.clone()])
            .await
            .unwrap();
        assert!(edges.is_empty());
    }
}
