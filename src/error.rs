//! Error taxonomy for preview operations
//!
//! Errors travel inside `Cmd` and `Msg` values, so every variant is `Clone`
//! and carries rendered messages rather than source error objects.

use std::path::PathBuf;

use thiserror::Error;

pub type PreviewResult<T> = Result<T, PreviewError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreviewError {
    /// The host refused to create a rendering surface
    #[error("Could not create preview surface: {0}")]
    Creation(String),

    #[error("Could not read template {}: {message}", path.display())]
    TemplateRead { path: PathBuf, message: String },

    #[error("Could not write export to {}: {message}", path.display())]
    ExportWrite { path: PathBuf, message: String },

    #[error("Document {0} is not open")]
    DocumentNotOpen(String),

    #[error("Preview registry was disposed")]
    Disposed,
}

impl PreviewError {
    pub fn template_read(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        PreviewError::TemplateRead {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
