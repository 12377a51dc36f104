use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("pdf export failed: {0}")]
    Pdf(String),
    #[error("docx export failed: {0}")]
    Docx(String),
    #[error("export io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("export task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub(crate) fn pdf_error(err: impl Display) -> ExportError {
    ExportError::Pdf(err.to_string())
}

pub(crate) fn docx_error(err: impl Display) -> ExportError {
    ExportError::Docx(err.to_string())
}
