use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimeError {
    #[error("Unknown user: {0}")]
    UnknownUser(i32),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),
}

pub type TimeResult<T> = Result<T, TimeError>;
