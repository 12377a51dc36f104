use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::answers::AnswersRecord;
use crate::expr::value_is_set;
use crate::fields::{FieldSpec, GroupRule, Requirement, field, fields_for_step, group_rules_for_step};
use crate::steps::StepId;
use crate::visibility::is_visible;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationError {
    /// Field id, or group rule id for "at least one of" failures.
    pub field: String,
    pub message: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<ValidationError>,
    #[serde(default)]
    pub missing_required: Vec<String>,
}

impl ValidationResult {
    pub fn error_for(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|error| error.field == field)
    }

    fn from_errors(errors: Vec<ValidationError>) -> Self {
        let missing_required = errors
            .iter()
            .filter(|error| error.code == "required")
            .map(|error| error.field.clone())
            .collect();
        ValidationResult {
            valid: errors.is_empty(),
            errors,
            missing_required,
        }
    }
}

/// Validates the fields and group rules of a single step.
pub fn validate_step(answers: &AnswersRecord, step: StepId) -> ValidationResult {
    let ctx = answers.to_value();
    let mut errors = Vec::new();

    for spec in fields_for_step(step) {
        if !is_visible(spec, &ctx) {
            continue;
        }
        let value = ctx.pointer(spec.pointer).unwrap_or(&Value::Null);
        if let Some(error) = validate_field(spec, value) {
            errors.push(error);
        }
    }

    for rule in group_rules_for_step(step) {
        if let Some(error) = validate_group(rule, &ctx) {
            errors.push(error);
        }
    }

    ValidationResult::from_errors(errors)
}

/// Validates every step in order.
pub fn validate(answers: &AnswersRecord) -> ValidationResult {
    let errors = StepId::ORDER
        .iter()
        .flat_map(|step| validate_step(answers, *step).errors)
        .collect();
    ValidationResult::from_errors(errors)
}

/// First step, in navigation order, that fails validation.
pub fn first_invalid_step(answers: &AnswersRecord) -> Option<(StepId, ValidationResult)> {
    StepId::ORDER.iter().find_map(|step| {
        let result = validate_step(answers, *step);
        (!result.valid).then_some((*step, result))
    })
}

fn validate_field(spec: &FieldSpec, value: &Value) -> Option<ValidationError> {
    let required = matches!(
        spec.required,
        Requirement::Always | Requirement::WhenVisible
    );
    if required && !value_is_set(value) {
        return Some(base_error(
            spec.id,
            spec.message.unwrap_or("This field is required"),
            "required",
        ));
    }

    if let Some((pattern, message)) = spec.format()
        && let Some(text) = value.as_str()
        && !text.is_empty()
        && !pattern.is_match(text)
    {
        return Some(base_error(spec.id, message, "pattern_mismatch"));
    }

    None
}

fn validate_group(rule: &GroupRule, ctx: &Value) -> Option<ValidationError> {
    if rule.when.evaluate(ctx) != Some(true) {
        return None;
    }
    let any_set = rule.members.iter().any(|member| {
        field(member)
            .and_then(|spec| ctx.pointer(spec.pointer))
            .is_some_and(value_is_set)
    });
    if any_set {
        None
    } else {
        Some(base_error(rule.id, rule.message, "group_required"))
    }
}

fn base_error(field: &str, message: &str, code: &str) -> ValidationError {
    ValidationError {
        field: field.into(),
        message: message.into(),
        code: code.into(),
    }
}
