//! HR vertical slice: employee hierarchy, compensation and reporting structure.

mod error;
mod model;
pub mod seed;
mod service;
mod store;

#[cfg(test)]
pub(crate) mod test_support;

use platform_db::DbPool;

pub use error::{HrError, HrResult};
pub use model::{
    Compensation, CompensationInput, Employee, EmployeeRef, NewEmployee, ReportingStructure,
    Upserted,
};
pub use service::{CompensationService, EmployeeService, ReportingStructureService};
pub use store::{CompensationStore, EmployeeStore};

/// Hands out the HR services over one shared pool.
#[derive(Clone, Debug)]
pub struct HrModule {
    db: DbPool,
}

impl HrModule {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn employees(&self) -> EmployeeService {
        EmployeeService::new(self.db.clone())
    }

    pub fn compensation(&self) -> CompensationService {
        CompensationService::new(self.db.clone())
    }

    pub fn reporting(&self) -> ReportingStructureService {
        ReportingStructureService::new(self.db.clone())
    }
}
