use platform_api::{ApiError, internal_error};
use sea_orm::DbErr;
use thiserror::Error;

pub type HrResult<T> = Result<T, HrError>;

#[derive(Debug, Error)]
pub enum HrError {
    #[error("direct report {0} does not exist")]
    UnknownReport(String),
    #[error("employee id {body} in body does not match {path}")]
    EmployeeIdMismatch { path: String, body: String },
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl From<HrError> for ApiError {
    fn from(err: HrError) -> Self {
        match err {
            HrError::UnknownReport(_) | HrError::EmployeeIdMismatch { .. } => {
                ApiError::bad_request(err.to_string())
            }
            HrError::Database(db) => internal_error(db),
        }
    }
}
