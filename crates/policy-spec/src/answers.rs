use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::fields::{FieldKind, field};

/// General information about the business publishing the policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralInfo {
    pub business_name: String,
    pub website_url: String,
    pub contact_email: String,
    pub minimum_age: String,
    pub parental_consent_required: bool,
}

/// Categories of personal data the site collects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DataCollection {
    pub collects_personal_info: bool,
    pub name: bool,
    pub email: bool,
    pub phone: bool,
    pub payment: bool,
    pub location: bool,
    pub ip: bool,
    pub cookies: bool,
    pub other: bool,
    pub other_specify: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UsagePurposes {
    pub user_communication: bool,
    pub payment_processing: bool,
    pub analytics: bool,
    pub service_improvement: bool,
    pub marketing: bool,
    pub other: bool,
}

/// Purposes the collected data is used for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DataUsage {
    pub purposes: UsagePurposes,
    pub other_specify: String,
}

/// Third parties the data is disclosed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ThirdPartySharing {
    pub shares_with_third_parties: bool,
    pub analytics: bool,
    pub advertising: bool,
    pub payment: bool,
    pub social: bool,
    pub other: bool,
    pub other_specify: String,
    pub third_parties_use_for_own_purposes: bool,
    pub third_party_purposes_specify: String,
}

/// Retention period per data category, as free text ("2 years").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RetentionPeriods {
    pub account_data: String,
    pub transaction_data: String,
    pub communication_history: String,
    pub analytics_data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageRetention {
    pub data_storage_location: String,
    pub security_measures: String,
    pub stores_data_indefinitely: bool,
    pub retention_periods: RetentionPeriods,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CookieTypes {
    pub essential: bool,
    pub functional: bool,
    pub analytics: bool,
    pub advertising: bool,
    pub other: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Cookies {
    pub uses_cookies: bool,
    pub types: CookieTypes,
    pub other_specify: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRights {
    pub provides_user_rights: bool,
    pub user_rights_process: String,
    pub provides_opt_out: bool,
    pub opt_out_process: String,
}

/// Regulations the business declares compliance with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Compliance {
    pub gdpr: bool,
    pub ccpa: bool,
    pub other: bool,
    pub other_specify: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationChannels {
    pub email: bool,
    pub site_notice: bool,
    pub popup: bool,
    pub other: bool,
}

/// How users learn about policy changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyChanges {
    pub notification_method: String,
    pub channels: NotificationChannels,
    pub other_specify: String,
    pub grace_period: String,
}

/// Complete questionnaire response, grouped by topic.
///
/// `Default` is the schema default: every flag false, every string empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AnswersRecord {
    pub general: GeneralInfo,
    pub collection: DataCollection,
    pub usage: DataUsage,
    pub sharing: ThirdPartySharing,
    pub storage: StorageRetention,
    pub cookies: Cookies,
    pub rights: UserRights,
    pub compliance: Compliance,
    pub notification: PolicyChanges,
    pub acknowledged_disclaimer: bool,
}

/// Errors raised when reading or writing a field by id.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("field '{field}' expects a {expected} value")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },
    #[error("answers could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Returns the schema default record.
pub fn defaults() -> AnswersRecord {
    AnswersRecord::default()
}

impl AnswersRecord {
    /// JSON view of the record, used by pointer-based rules.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Result<Self, FieldError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Reads a single field by its flat id (e.g. `sharesWithOtherSpecify`).
    pub fn get(&self, id: &str) -> Result<Value, FieldError> {
        let spec = field(id).ok_or_else(|| FieldError::UnknownField(id.to_string()))?;
        Ok(self
            .to_value()
            .pointer(spec.pointer)
            .cloned()
            .unwrap_or(Value::Null))
    }

    /// Writes a single field by its flat id. The value must match the field kind.
    pub fn set(&mut self, id: &str, value: Value) -> Result<(), FieldError> {
        let spec = field(id).ok_or_else(|| FieldError::UnknownField(id.to_string()))?;
        let matches = match spec.kind {
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Text | FieldKind::Email | FieldKind::Url => value.is_string(),
        };
        if !matches {
            return Err(FieldError::TypeMismatch {
                field: id.to_string(),
                expected: spec.kind.label(),
            });
        }

        let mut current = self.to_value();
        if let Some(slot) = current.pointer_mut(spec.pointer) {
            *slot = value;
        }
        *self = Self::from_value(current)?;
        Ok(())
    }

    pub fn set_flag(&mut self, id: &str, flag: bool) -> Result<(), FieldError> {
        self.set(id, Value::Bool(flag))
    }

    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> Result<(), FieldError> {
        self.set(id, Value::String(text.into()))
    }
}
