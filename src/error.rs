use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("task {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Store(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
