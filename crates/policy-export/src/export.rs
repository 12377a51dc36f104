use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use policy_spec::{GeneratedPolicy, export_file_name};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::docx::render_docx;
use crate::error::ExportError;
use crate::options::ExportOptions;
use crate::pdf::render_pdf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Pdf, ExportFormat::Docx];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            other => Err(format!("unknown export format '{other}' (expected pdf or docx)")),
        }
    }
}

/// A rendered download: bytes plus the file name they should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Export {
    /// Writes the export into `dir`, creating it if needed.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        debug!(path = %path.display(), "export written");
        Ok(path)
    }
}

/// Renders synchronously.
pub fn render(
    policy: &GeneratedPolicy,
    format: ExportFormat,
    options: ExportOptions,
) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Pdf => render_pdf(policy, options),
        ExportFormat::Docx => render_docx(policy, options),
    }
}

/// Renders on a blocking task over an owned snapshot of the policy. The file
/// name is derived from `business_name`.
pub async fn export(
    policy: &GeneratedPolicy,
    business_name: &str,
    format: ExportFormat,
    options: ExportOptions,
) -> Result<Export, ExportError> {
    let snapshot = policy.clone();
    let file_name = export_file_name(business_name, format.extension());
    let bytes =
        tokio::task::spawn_blocking(move || render(&snapshot, format, options)).await??;
    Ok(Export {
        format,
        file_name,
        bytes,
    })
}
