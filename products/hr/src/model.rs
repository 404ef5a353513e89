use chrono::{DateTime, Utc};
use entity::{compensation, employee};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{HrError, HrResult};

/// Employee as exposed over the API. `direct_reports` is `None` when the
/// reports of this record were not loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub department: String,
    pub direct_reports: Option<Vec<Employee>>,
}

impl Employee {
    pub(crate) fn with_reports(record: employee::Model, reports: Vec<Employee>) -> Self {
        Self {
            direct_reports: Some(reports),
            ..Self::from(record)
        }
    }

    /// Ids of the loaded direct reports, in order.
    pub fn report_ids(&self) -> Vec<&str> {
        self.direct_reports
            .iter()
            .flatten()
            .map(|report| report.employee_id.as_str())
            .collect()
    }
}

impl From<employee::Model> for Employee {
    fn from(record: employee::Model) -> Self {
        Self {
            employee_id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            position: record.position,
            department: record.department,
            direct_reports: None,
        }
    }
}

/// Reference to an existing employee; other fields in the payload are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRef {
    pub employee_id: String,
}

/// Create / replace payload. Direct reports arrive as id-only stubs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    #[serde(default)]
    pub employee_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub department: String,
    #[serde(default)]
    pub direct_reports: Option<Vec<EmployeeRef>>,
}

impl NewEmployee {
    /// Report ids in payload order, first occurrence wins.
    pub fn report_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for report in self.direct_reports.iter().flatten() {
            if !ids.contains(&report.employee_id) {
                ids.push(report.employee_id.clone());
            }
        }
        ids
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compensation {
    pub employee_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub salary: Decimal,
    pub effective_date: DateTime<Utc>,
}

impl From<compensation::Model> for Compensation {
    fn from(record: compensation::Model) -> Self {
        Self {
            employee_id: record.employee_id,
            salary: record.salary,
            effective_date: record.effective_date.with_timezone(&Utc),
        }
    }
}

/// Compensation body of `PUT /api/compensation/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompensationInput {
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub salary: Decimal,
    pub effective_date: DateTime<Utc>,
}

impl CompensationInput {
    /// Binds the body to the employee named in the path. A missing or empty
    /// body id takes the path id; any other id must match it.
    pub fn for_employee(self, path_id: &str) -> HrResult<Compensation> {
        let employee_id = match self.employee_id {
            Some(body_id) if !body_id.is_empty() && body_id != path_id => {
                return Err(HrError::EmployeeIdMismatch {
                    path: path_id.to_string(),
                    body: body_id,
                });
            }
            _ => path_id.to_string(),
        };
        Ok(Compensation {
            employee_id,
            salary: self.salary,
            effective_date: self.effective_date,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Upserted {
    Created(Compensation),
    Replaced(Compensation),
}

impl Upserted {
    pub fn is_created(&self) -> bool {
        matches!(self, Upserted::Created(_))
    }

    pub fn compensation(&self) -> &Compensation {
        match self {
            Upserted::Created(comp) | Upserted::Replaced(comp) => comp,
        }
    }

    pub fn into_compensation(self) -> Compensation {
        match self {
            Upserted::Created(comp) | Upserted::Replaced(comp) => comp,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingStructure {
    pub employee: Employee,
    pub number_of_reports: usize,
}
