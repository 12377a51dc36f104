use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::answers::AnswersRecord;
use crate::generate::GeneratedPolicy;

pub const POLICY_TYPE: &str = "privacy";

/// A generated policy together with the answers it came from, as persisted
/// by an external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedPolicy {
    pub policy_name: String,
    pub policy_type: String,
    pub policy: GeneratedPolicy,
    pub answers: AnswersRecord,
}

impl SavedPolicy {
    pub fn new(policy: GeneratedPolicy, answers: AnswersRecord) -> Self {
        Self {
            policy_name: policy.title.clone(),
            policy_type: POLICY_TYPE.to_string(),
            policy,
            answers,
        }
    }

    /// Plain key-value document view.
    pub fn to_document(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    pub fn from_document(document: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(document))
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, serde_cbor::Error> {
        serde_cbor::to_vec(self)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, serde_cbor::Error> {
        serde_cbor::from_slice(bytes)
    }
}
