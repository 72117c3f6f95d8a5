use std::path::PathBuf;

use thiserror::Error;

pub type FcrResult<T> = Result<T, FcrError>;

#[derive(Debug, Error)]
pub enum FcrError {
    #[error("config error: {0}")]
    Config(String),

    #[error("{} already exists, use --force to overwrite", .0.display())]
    AlreadyExists(PathBuf),

    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
