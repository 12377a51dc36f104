#![allow(missing_docs)]

pub mod docx;
pub mod error;
pub mod export;
pub mod layout;
pub mod options;
pub mod pdf;

pub use docx::{Alignment, DocxBlock, blocks as docx_blocks, render_docx};
pub use error::ExportError;
pub use export::{Export, ExportFormat, export, render};
pub use layout::{LaidOutPage, TextRun, layout};
pub use options::{ExportOptions, WATERMARK_TEXT};
pub use pdf::render_pdf;
