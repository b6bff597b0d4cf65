use axum::http::StatusCode;

use crate::error::EmployeeServiceError;

/// Why a command could not produce its own transition.
///
/// The dispatcher absorbs every variant: it logs the kind and renders the
/// generic error view with [`ActionError::status`].
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error("unknown command `{command}` for action `{action}`")]
    UnknownCommand { action: String, command: String },
    #[error("invalid anti-forgery token")]
    InvalidToken,
    #[error("forbidden")]
    Forbidden,
    #[error("bad parameter `{0}`")]
    BadParameter(&'static str),
    #[error(transparent)]
    Service(#[from] EmployeeServiceError),
}

impl ActionError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownAction(_) => "UNKNOWN_ACTION",
            Self::UnknownCommand { .. } => "UNKNOWN_COMMAND",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Forbidden => "FORBIDDEN",
            Self::BadParameter(_) => "BAD_PARAMETER",
            Self::Service(e) => e.kind(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnknownAction(_) | Self::UnknownCommand { .. } => StatusCode::NOT_FOUND,
            Self::InvalidToken | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadParameter(_) => StatusCode::BAD_REQUEST,
            Self::Service(EmployeeServiceError::EmployeeNotFound) => StatusCode::NOT_FOUND,
            Self::Service(EmployeeServiceError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Service(EmployeeServiceError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::Service(EmployeeServiceError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
