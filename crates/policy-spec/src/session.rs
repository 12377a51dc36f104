use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::answers::{AnswersRecord, FieldError};
use crate::draft::{Autosaver, DraftStore};
use crate::fields::{FieldSpec, field, fields_for_step};
use crate::steps::StepId;
use crate::validate::{ValidationResult, first_invalid_step, validate_step};
use crate::visibility::{VisibilityMap, is_visible, resolve_visibility};

#[derive(Debug, Error)]
pub enum StepError {
    #[error("step '{step}' failed validation")]
    Invalid {
        step: StepId,
        result: ValidationResult,
    },
    #[error("'{0}' is the final step; submit the form instead")]
    Terminal(StepId),
    #[error("already at the first step")]
    AtStart,
    #[error("step '{0}' has not been reached yet")]
    Unreachable(StepId),
    #[error("the form can only be submitted from the review step (active: {0})")]
    NotOnReview(StepId),
}

impl StepError {
    pub fn validation(&self) -> Option<&ValidationResult> {
        match self {
            StepError::Invalid { result, .. } => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldStatus {
    pub dirty: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

/// Multi-step questionnaire state with debounced draft persistence.
#[derive(Debug)]
pub struct FormSession<S> {
    answers: AnswersRecord,
    active: StepId,
    completed: Vec<StepId>,
    fields: BTreeMap<String, FieldStatus>,
    autosaver: Autosaver<S>,
}

impl<S: DraftStore> FormSession<S> {
    /// Starts a session, resuming from the stored draft when one exists.
    pub fn start(store: S, interval: Duration) -> Self {
        let autosaver = Autosaver::new(store, interval);
        let answers = match autosaver.restore() {
            Some(draft) => {
                debug!("resuming from saved draft");
                draft
            }
            None => AnswersRecord::default(),
        };
        Self {
            answers,
            active: StepId::first(),
            completed: Vec::new(),
            fields: BTreeMap::new(),
            autosaver,
        }
    }

    pub fn answers(&self) -> &AnswersRecord {
        &self.answers
    }

    pub fn active_step(&self) -> StepId {
        self.active
    }

    pub fn completed_steps(&self) -> &[StepId] {
        &self.completed
    }

    pub fn is_completed(&self, step: StepId) -> bool {
        self.completed.contains(&step)
    }

    pub fn field_status(&self, id: &str) -> Option<&FieldStatus> {
        self.fields.get(id)
    }

    pub fn autosaver(&self) -> &Autosaver<S> {
        &self.autosaver
    }

    pub fn visibility(&self) -> VisibilityMap {
        resolve_visibility(&self.answers)
    }

    /// Fields of the active step that are currently shown.
    pub fn visible_fields(&self) -> Vec<&'static FieldSpec> {
        let ctx = self.answers.to_value();
        fields_for_step(self.active)
            .filter(|spec| is_visible(spec, &ctx))
            .collect()
    }

    pub fn set_field(&mut self, id: &str, value: Value) -> Result<(), FieldError> {
        self.set_field_at(id, value, Instant::now())
    }

    pub fn set_field_at(&mut self, id: &str, value: Value, now: Instant) -> Result<(), FieldError> {
        self.answers.set(id, value)?;
        let status = self.fields.entry(id.to_string()).or_default();
        status.dirty = true;
        status.error = None;
        self.autosaver.record(&self.answers, now);
        Ok(())
    }

    /// Applies an arbitrary mutation to the answers.
    pub fn edit(&mut self, apply: impl FnOnce(&mut AnswersRecord)) {
        self.edit_at(apply, Instant::now());
    }

    pub fn edit_at(&mut self, apply: impl FnOnce(&mut AnswersRecord), now: Instant) {
        apply(&mut self.answers);
        self.autosaver.record(&self.answers, now);
    }

    /// Writes the pending draft once the quiet window has passed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        self.autosaver.poll(now)
    }

    pub fn flush_draft(&mut self) -> bool {
        self.autosaver.flush()
    }

    pub fn validate_active(&self) -> ValidationResult {
        validate_step(&self.answers, self.active)
    }

    /// Validates the active step and advances on success.
    pub fn next(&mut self) -> Result<StepId, StepError> {
        let step = self.active;
        let next = step.next().ok_or(StepError::Terminal(step))?;
        let result = validate_step(&self.answers, step);
        self.apply_errors(step, &result);
        if !result.valid {
            return Err(StepError::Invalid { step, result });
        }
        self.mark_completed(step);
        self.active = next;
        debug!(from = %step, to = %next, "advanced step");
        Ok(next)
    }

    pub fn previous(&mut self) -> Result<StepId, StepError> {
        let previous = self.active.previous().ok_or(StepError::AtStart)?;
        self.active = previous;
        Ok(previous)
    }

    /// Moves to a completed step, or stays on the active one.
    pub fn jump_to(&mut self, step: StepId) -> Result<(), StepError> {
        if step != self.active && !self.is_completed(step) {
            return Err(StepError::Unreachable(step));
        }
        self.active = step;
        Ok(())
    }

    /// Revalidates every step and returns the final answers.
    ///
    /// On failure the session moves to the first invalid step.
    pub fn submit(&mut self) -> Result<AnswersRecord, StepError> {
        if !self.active.is_terminal() {
            return Err(StepError::NotOnReview(self.active));
        }
        if let Some((step, result)) = first_invalid_step(&self.answers) {
            self.apply_errors(step, &result);
            self.active = step;
            return Err(StepError::Invalid { step, result });
        }
        self.mark_completed(StepId::Review);
        self.autosaver.clear();
        debug!("form submitted");
        Ok(self.answers.clone())
    }

    pub fn progress(&self) -> Progress {
        let total = StepId::ORDER.len();
        let completed = self.completed.len();
        let percent = ((completed as f64 / total as f64) * 100.0).round() as u8;
        Progress {
            completed,
            total,
            percent,
        }
    }

    fn mark_completed(&mut self, step: StepId) {
        if !self.completed.contains(&step) {
            self.completed.push(step);
        }
    }

    fn apply_errors(&mut self, step: StepId, result: &ValidationResult) {
        for spec in fields_for_step(step) {
            if let Some(status) = self.fields.get_mut(spec.id) {
                status.error = None;
            }
        }
        for error in &result.errors {
            if field(&error.field).is_none() {
                continue;
            }
            self.fields.entry(error.field.clone()).or_default().error =
                Some(error.message.clone());
        }
    }
}
