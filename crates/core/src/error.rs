// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Channel error: {0}")]
    Channel(#[from] crate::application::channel::ChannelError),

    #[error("Task join error: {0}")]
    Join(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            AppError::Join(format!("task panicked: {err}"))
        } else {
            AppError::Join(format!("task cancelled: {err}"))
        }
    }
}
