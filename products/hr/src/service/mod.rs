mod compensation;
mod employee;
mod reporting;

pub use compensation::CompensationService;
pub use employee::EmployeeService;
pub use reporting::ReportingStructureService;
