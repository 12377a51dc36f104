use serde_json::Value;

use crate::answers::AnswersRecord;
use crate::fields::{FIELDS, FieldSpec};

pub type VisibilityMap = std::collections::BTreeMap<String, bool>;

/// Computes which fields are shown for the given answers.
///
/// Conditions that cannot be evaluated leave the field visible.
pub fn resolve_visibility(answers: &AnswersRecord) -> VisibilityMap {
    let ctx = answers.to_value();
    FIELDS
        .iter()
        .map(|spec| (spec.id.to_string(), is_visible(spec, &ctx)))
        .collect()
}

pub(crate) fn is_visible(spec: &FieldSpec, ctx: &Value) -> bool {
    spec.visible_if
        .as_ref()
        .map(|expr| expr.evaluate(ctx).unwrap_or(true))
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependent_fields_follow_their_parent_flag() {
        let mut answers = AnswersRecord::default();
        let map = resolve_visibility(&answers);
        assert_eq!(map.get("collectsName"), Some(&false));
        assert_eq!(map.get("businessName"), Some(&true));
        assert_eq!(map.get("dataRetentionPeriods.accountData"), Some(&true));

        answers.collection.collects_personal_info = true;
        answers.storage.stores_data_indefinitely = true;
        let map = resolve_visibility(&answers);
        assert_eq!(map.get("collectsName"), Some(&true));
        assert_eq!(map.get("collectsOtherSpecify"), Some(&false));
        assert_eq!(map.get("dataRetentionPeriods.accountData"), Some(&false));
    }
}
