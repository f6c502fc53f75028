use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Invalid task number: '{0}'")]
    OutOfRange(String),

    #[error("Task not found: #{0}")]
    TaskNotFound(u32),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Malformed task file: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
