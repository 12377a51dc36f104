use serde_json::json;

use policy_spec::{
    AnswersRecord, FieldError, StepId, answers_schema, defaults, resolve_visibility, validate,
    validate_step,
};

fn fixture() -> AnswersRecord {
    serde_json::from_str(include_str!("fixtures/complete_answers.json")).unwrap()
}

#[test]
fn complete_answers_pass_every_step() {
    let result = validate(&fixture());
    assert!(result.valid, "{:?}", result.errors);
}

#[test]
fn defaults_are_fully_populated() {
    let value = defaults().to_value();
    assert_eq!(value["general"]["businessName"], "");
    assert_eq!(value["usage"]["purposes"]["marketing"], false);
    assert_eq!(value["storage"]["retentionPeriods"]["accountData"], "");
    assert_eq!(value["acknowledgedDisclaimer"], false);
}

#[test]
fn sharing_other_requires_specification() {
    let mut answers = AnswersRecord::default();
    answers.set_flag("sharesWithThirdParties", true).unwrap();
    answers.set_flag("sharesWithOther", true).unwrap();
    answers.set_text("sharesWithOtherSpecify", "").unwrap();

    let result = validate_step(&answers, StepId::Sharing);
    assert!(!result.valid);
    let error = result.error_for("sharesWithOtherSpecify").unwrap();
    assert_eq!(error.message, "Please specify other third parties");
    assert_eq!(error.code, "required");

    answers.set_text("sharesWithOtherSpecify", "ad-network").unwrap();
    let result = validate_step(&answers, StepId::Sharing);
    assert!(result.valid, "{:?}", result.errors);
}

#[test]
fn hidden_fields_are_never_validated() {
    let mut answers = AnswersRecord::default();
    answers.sharing.other = true;
    answers.sharing.other_specify.clear();
    assert!(validate_step(&answers, StepId::Sharing).valid);

    let visibility = resolve_visibility(&answers);
    assert_eq!(visibility.get("sharesWithOtherSpecify"), Some(&false));
}

#[test]
fn general_step_checks_required_and_formats() {
    let mut answers = AnswersRecord::default();
    let result = validate_step(&answers, StepId::General);
    assert_eq!(
        result.missing_required,
        vec!["businessName", "websiteUrl", "contactEmail"]
    );

    answers.general.business_name = "Acme".into();
    answers.general.website_url = "acme.example".into();
    answers.general.contact_email = "privacy@acme".into();
    let result = validate_step(&answers, StepId::General);
    assert_eq!(
        result.error_for("websiteUrl").unwrap().message,
        "Invalid URL (e.g., https://example.com)"
    );
    assert_eq!(
        result.error_for("contactEmail").unwrap().message,
        "Invalid email address"
    );
}

#[test]
fn group_rules_require_one_member() {
    let mut answers = AnswersRecord::default();
    answers.collection.collects_personal_info = true;
    let result = validate_step(&answers, StepId::DataCollection);
    assert_eq!(
        result.error_for("dataTypes").unwrap().message,
        "Select at least one type of data you collect"
    );

    answers.collection.ip = true;
    assert!(validate_step(&answers, StepId::DataCollection).valid);

    let result = validate_step(&AnswersRecord::default(), StepId::Retention);
    assert!(result.error_for("dataRetentionPeriods").is_some());

    let mut answers = fixture();
    answers.storage.stores_data_indefinitely = true;
    answers.storage.retention_periods = Default::default();
    assert!(validate_step(&answers, StepId::Retention).valid);
}

#[test]
fn review_requires_acknowledgement() {
    let mut answers = fixture();
    answers.acknowledged_disclaimer = false;
    let result = validate_step(&answers, StepId::Review);
    assert_eq!(
        result.error_for("acknowledgedDisclaimer").unwrap().message,
        "You must acknowledge that this policy is not legal advice"
    );
}

#[test]
fn set_rejects_unknown_fields_and_wrong_kinds() {
    let mut answers = AnswersRecord::default();
    assert!(matches!(
        answers.set("noSuchField", json!(true)),
        Err(FieldError::UnknownField(_))
    ));
    assert!(matches!(
        answers.set("collectsName", json!("yes")),
        Err(FieldError::TypeMismatch { .. })
    ));
    answers
        .set("cookieTypes.analytics", json!(true))
        .unwrap();
    assert!(answers.cookies.types.analytics);
    assert_eq!(answers.get("cookieTypes.analytics").unwrap(), json!(true));
}

#[test]
fn schema_describes_answer_groups() {
    let schema = answers_schema();
    let props = schema.get("properties").unwrap().as_object().unwrap();
    assert!(props.contains_key("general"));
    assert!(props.contains_key("acknowledgedDisclaimer"));
}
