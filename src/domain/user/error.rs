use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("user not found")]
    NotFound,
    #[error("storage error: {0}")]
    Storage(#[from] AppError),
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::Invalid(msg) => AppError::BadRequest(msg),
            UserServiceError::NotFound => AppError::NotFound("User not found".to_string()),
            UserServiceError::Storage(inner) => inner,
        }
    }
}
