//! sea-orm entities for the HR tables.

pub mod compensation;
pub mod employee;
pub mod employee_report;
