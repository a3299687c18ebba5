use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ProjectError {
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for ProjectError {
    fn from(err: sqlx::Error) -> Self {
        ProjectError::Storage(err.to_string())
    }
}
