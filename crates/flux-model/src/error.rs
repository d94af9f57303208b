use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown dataset kind '{0}' (expected bids, mriqc or freesurfer)")]
    UnknownKind(String),
    #[error("unknown dimension '{0}'")]
    UnknownDimension(String),
    #[error("row has {actual} cells but table has {expected} columns")]
    RowWidth { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
