use std::time::{Duration, Instant};

use serde_json::json;

use policy_spec::{AnswersRecord, FormSession, MemoryDraftStore, StepError, StepId};

const WINDOW: Duration = Duration::from_millis(1000);

fn fixture() -> AnswersRecord {
    serde_json::from_str(include_str!("fixtures/complete_answers.json")).unwrap()
}

fn session_with(answers: AnswersRecord) -> FormSession<MemoryDraftStore> {
    let store = MemoryDraftStore {
        record: Some(answers),
        writes: 0,
    };
    FormSession::start(store, WINDOW)
}

#[test]
fn starts_from_defaults_without_draft() {
    let session = FormSession::start(MemoryDraftStore::default(), WINDOW);
    assert_eq!(session.answers(), &AnswersRecord::default());
    assert_eq!(session.active_step(), StepId::General);
    assert_eq!(session.progress().percent, 0);
}

#[test]
fn existing_draft_overrides_defaults() {
    let session = session_with(fixture());
    assert_eq!(session.answers().general.business_name, "Acme Co.");
}

#[test]
fn next_rejects_invalid_step_without_moving() {
    let mut session = FormSession::start(MemoryDraftStore::default(), WINDOW);
    let err = session.next().unwrap_err();
    let result = err.validation().unwrap();
    assert_eq!(result.errors.len(), 3);
    assert_eq!(session.active_step(), StepId::General);
    assert_eq!(
        session.field_status("businessName").unwrap().error.as_deref(),
        Some("Business name is required")
    );

    session
        .set_field("businessName", json!("Acme Co."))
        .unwrap();
    let status = session.field_status("businessName").unwrap();
    assert!(status.dirty);
    assert!(status.error.is_none());
}

#[test]
fn walks_every_step_and_submits() {
    let mut session = session_with(fixture());
    for expected in &StepId::ORDER[1..] {
        assert_eq!(session.next().unwrap(), *expected);
    }
    assert_eq!(session.active_step(), StepId::Review);
    assert!(matches!(session.next(), Err(StepError::Terminal(StepId::Review))));
    assert_eq!(session.progress().completed, 8);
    assert_eq!(session.progress().percent, 89);

    let submitted = session.submit().unwrap();
    assert_eq!(submitted, fixture());
    assert!(session.autosaver().store().record.is_none());
    assert_eq!(session.progress().percent, 100);
}

#[test]
fn previous_never_validates() {
    let mut session = session_with(fixture());
    session.next().unwrap();
    session.edit(|answers| answers.general.business_name.clear());
    assert_eq!(session.previous().unwrap(), StepId::General);
    assert!(matches!(session.previous(), Err(StepError::AtStart)));
}

#[test]
fn jump_to_only_reaches_completed_steps() {
    let mut session = session_with(fixture());
    session.next().unwrap();
    session.next().unwrap();
    assert!(matches!(
        session.jump_to(StepId::Cookies),
        Err(StepError::Unreachable(StepId::Cookies))
    ));
    session.jump_to(StepId::General).unwrap();
    assert_eq!(session.active_step(), StepId::General);
    session.jump_to(StepId::DataCollection).unwrap();
}

#[test]
fn submit_moves_to_first_invalid_step() {
    let mut session = session_with(fixture());
    for _ in 1..StepId::ORDER.len() {
        session.next().unwrap();
    }
    session.edit(|answers| {
        answers.sharing.other_specify.clear();
        answers.storage.security_measures.clear();
    });

    let err = session.submit().unwrap_err();
    assert!(matches!(err, StepError::Invalid { step: StepId::Sharing, .. }));
    assert_eq!(session.active_step(), StepId::Sharing);
    assert!(session.autosaver().store().record.is_some());
}

#[test]
fn submit_only_from_review() {
    let mut session = session_with(fixture());
    assert!(matches!(
        session.submit(),
        Err(StepError::NotOnReview(StepId::General))
    ));
}

#[test]
fn burst_of_edits_produces_one_write() {
    let start = Instant::now();
    let mut session = FormSession::start(MemoryDraftStore::default(), WINDOW);
    for (offset, name) in ["A", "Ac", "Acm", "Acme"].iter().enumerate() {
        let at = start + Duration::from_millis(offset as u64 * 200);
        session
            .set_field_at("businessName", json!(name), at)
            .unwrap();
        assert!(!session.tick_at(at + Duration::from_millis(100)));
    }
    assert!(session.tick_at(start + Duration::from_millis(1600)));
    assert!(!session.tick_at(start + Duration::from_millis(5000)));

    let store = session.autosaver().store();
    assert_eq!(store.writes, 1);
    assert_eq!(
        store.record.as_ref().unwrap().general.business_name,
        "Acme"
    );
}

#[test]
fn visible_fields_follow_parent_flags() {
    let mut session = FormSession::start(MemoryDraftStore::default(), WINDOW);
    session
        .set_field("websiteUrl", json!("https://acme.example"))
        .unwrap();
    session
        .set_field("businessName", json!("Acme"))
        .unwrap();
    session
        .set_field("contactEmail", json!("hi@acme.example"))
        .unwrap();
    session.next().unwrap();
    assert_eq!(session.visible_fields().len(), 1);
    session
        .set_field("collectsPersonalInfo", json!(true))
        .unwrap();
    assert_eq!(session.visible_fields().len(), 9);
}
