use thiserror::Error;

/// Failures surfaced to callers of the review service.
///
/// `Validation` is the caller's fault (bad payload or query) and maps to a
/// 4xx; `Internal` is ours and maps to a 5xx. Neither is produced after the
/// approval store has been written to.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Internal(err.to_string())
        } else {
            Self::Validation(format!("malformed JSON: {err}"))
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
