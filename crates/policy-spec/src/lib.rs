#![allow(missing_docs)]

pub mod answers;
pub mod draft;
pub mod expr;
pub mod fields;
pub mod filename;
pub mod generate;
pub mod record;
pub mod render;
pub mod session;
pub mod steps;
pub mod summary;
pub mod validate;
pub mod visibility;

pub use answers::{AnswersRecord, FieldError, defaults};
pub use draft::{
    Autosaver, DEFAULT_AUTOSAVE_INTERVAL, DRAFT_KEY, DraftError, DraftStore, FileDraftStore,
    MemoryDraftStore,
};
pub use expr::Expr;
pub use fields::{FIELDS, FieldKind, FieldSpec, GROUP_RULES, GroupRule, Requirement, field};
pub use filename::{export_file_name, slugify};
pub use generate::{
    Clock, FixedClock, GeneratedPolicy, PolicySection, SystemClock, format_long_date, generate,
    generate_today,
};
pub use record::SavedPolicy;
pub use render::{RenderError, WATERMARK_TEXT, render_markdown, render_text};
pub use session::{FieldStatus, FormSession, Progress, StepError};
pub use steps::StepId;
pub use summary::{SummaryEntry, SummarySection, summarize};
pub use validate::{ValidationError, ValidationResult, first_invalid_step, validate, validate_step};
pub use visibility::{VisibilityMap, resolve_visibility};

/// JSON schema of the answers record.
pub fn answers_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(AnswersRecord)).unwrap_or_default()
}
