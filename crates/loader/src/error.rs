use bootkit_api::LayoutError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepackageError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Source '{}' does not exist", .0.display())]
    MissingSource(PathBuf),
    #[error("Duplicate archive entry '{0}'")]
    DuplicateEntry(String),
}

impl From<walkdir::Error> for RepackageError {
    fn from(err: walkdir::Error) -> Self {
        RepackageError::Io(err.into())
    }
}

pub type Result<T> = std::result::Result<T, RepackageError>;
