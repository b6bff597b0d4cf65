/// Employee service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum EmployeeServiceError {
    #[error("employee not found")]
    EmployeeNotFound,
    #[error("invalid input")]
    InvalidInput(Vec<String>),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl EmployeeServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmployeeNotFound => "EMPLOYEE_NOT_FOUND",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Internal(_) => "INTERNAL",
        }
    }
}
