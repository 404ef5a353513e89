//! Persistence for the HR tables.
//!
//! Store functions are generic over [`sea_orm::ConnectionTrait`] so they run
//! unchanged on the pool or inside a transaction. Callers that write own the
//! transaction and commit it once all steps succeed.

mod compensation;
mod employee;

pub use compensation::CompensationStore;
pub use employee::EmployeeStore;
