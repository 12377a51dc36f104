use chrono::NaiveDate;

use policy_spec::{
    AnswersRecord, FixedClock, GeneratedPolicy, SavedPolicy, generate, render_markdown, render_text,
    WATERMARK_TEXT,
};

fn fixture() -> AnswersRecord {
    serde_json::from_str(include_str!("fixtures/complete_answers.json")).unwrap()
}

fn clock() -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap())
}

fn build(answers: &AnswersRecord) -> GeneratedPolicy {
    generate(answers, &clock())
}

#[test]
fn always_ten_sections_in_fixed_order() {
    for answers in [AnswersRecord::default(), fixture()] {
        let policy = build(&answers);
        let headings: Vec<_> = policy.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec![
                "1. Introduction",
                "2. Information We Collect",
                "3. How We Use Your Information",
                "4. Disclosure of Your Information",
                "5. Data Security and Retention",
                "6. Cookies and Tracking Technologies",
                "7. Your Privacy Rights",
                "8. Legal Compliance",
                "9. Changes to This Privacy Policy",
                "10. Contact Us",
            ]
        );
        assert!(
            policy
                .sections
                .iter()
                .all(|section| section.content.iter().all(|p| !p.trim().is_empty()))
        );
    }
}

#[test]
fn title_and_date_come_from_answers_and_clock() {
    let policy = build(&fixture());
    assert_eq!(policy.title, "Privacy Policy for Acme Co.");
    assert_eq!(policy.last_updated, "January 5, 2025");
}

#[test]
fn no_personal_info_yields_single_paragraph() {
    let mut answers = fixture();
    answers.collection.collects_personal_info = false;
    let policy = build(&answers);

    let collected = &policy.sections[1].content;
    assert_eq!(
        collected,
        &vec!["We do not collect personal information from visitors to our Site.".to_string()]
    );
    let usage = &policy.sections[2].content;
    assert_eq!(usage.len(), 1);
    assert!(usage[0].starts_with("We do not collect personal information, therefore"));
}

#[test]
fn enumerations_follow_display_order() {
    let policy = build(&fixture());
    assert_eq!(
        policy.sections[1].content[1],
        "The personal information we may collect includes: Name, Email address, Payment information (credit card numbers, billing addresses), IP addresses, Shipping addresses."
    );
    assert_eq!(
        policy.sections[3].content[1],
        "With analytics providers who help us understand how you use our Site; With payment processors to securely process your payments; Shipping carriers who deliver your orders."
    );
}

#[test]
fn sharing_without_channels_still_has_a_sentence() {
    let mut answers = AnswersRecord::default();
    answers.sharing.shares_with_third_parties = true;
    let policy = build(&answers);
    let sharing = &policy.sections[3].content;
    assert_eq!(sharing.len(), 3);
    assert!(!sharing[1].trim().is_empty());
    assert!(sharing[1].ends_with('.'));
}

#[test]
fn own_purposes_fallback() {
    let mut answers = AnswersRecord::default();
    answers.sharing.shares_with_third_parties = true;
    answers.sharing.third_parties_use_for_own_purposes = true;
    let policy = build(&answers);
    assert_eq!(
        policy.sections[3].content[2],
        "These third parties may use this information for their own purposes, including: various business purposes."
    );
}

#[test]
fn retention_lists_only_filled_periods() {
    let policy = build(&fixture());
    let storage = &policy.sections[4].content;
    assert_eq!(
        storage[0],
        "Your information is stored on servers located in the European Union."
    );
    assert_eq!(
        storage[2],
        "We retain different types of personal information for varying periods: account data for the life of your account; transaction records for 7 years."
    );
    assert!(storage[3].starts_with("For any data not specifically mentioned above"));

    let mut answers = fixture();
    answers.storage.stores_data_indefinitely = true;
    let storage = build(&answers).sections[4].content.clone();
    assert_eq!(storage.len(), 4);
    assert!(storage[2].starts_with("We store your personal information for as long as necessary"));
}

#[test]
fn regulation_summary_lists_enabled_regulations_in_order() {
    let policy = build(&fixture());
    let legal = &policy.sections[7].content;
    assert_eq!(
        legal[0],
        "Our privacy practices comply with the following regulations: GDPR, CCPA, PIPEDA."
    );
    assert_eq!(legal.len(), 6);
    assert!(legal[5].starts_with("We also comply with PIPEDA"));

    let mut answers = fixture();
    answers.compliance.gdpr = false;
    answers.compliance.other = false;
    let legal = build(&answers).sections[7].content.clone();
    assert_eq!(
        legal[0],
        "Our privacy practices comply with the following regulations: CCPA."
    );
    assert_eq!(legal.len(), 3);

    let legal = build(&AnswersRecord::default()).sections[7].content.clone();
    assert_eq!(
        legal,
        vec![
            "We comply with all applicable privacy laws and regulations in the jurisdictions where we operate."
                .to_string()
        ]
    );
}

#[test]
fn user_rights_reference_the_contact_email() {
    let mut answers = fixture();
    answers.rights.user_rights_process.clear();
    answers.compliance.ccpa = false;
    let rights = build(&answers).sections[6].content.clone();
    assert_eq!(
        rights[1],
        "To exercise these rights, you can contact us at privacy@acme.example with the subject line 'Privacy Request'."
    );
    assert_eq!(
        rights[2],
        "To exercise any of your rights under the GDPR, please contact us at privacy@acme.example with the subject line 'Privacy Request'."
    );

    let rights = build(&AnswersRecord::default()).sections[6].content.clone();
    assert_eq!(rights.len(), 1);
    assert!(rights[0].starts_with("If you have any questions about your personal information"));
}

#[test]
fn policy_changes_join_channels_with_or() {
    let changes = build(&fixture()).sections[8].content.clone();
    assert_eq!(
        changes,
        vec![
            "We may update our Privacy Policy from time to time. We will notify you of any changes by email.".to_string(),
            "We will inform you about significant changes via email (if you've provided it) or a prominent notice on our Site.".to_string(),
            "Changes to this Privacy Policy will take effect after a grace period of 30 days.".to_string(),
        ]
    );
    let changes = build(&AnswersRecord::default()).sections[8].content.clone();
    assert_eq!(changes.len(), 2);
    assert!(changes[1].ends_with("immediately upon posting."));
}

#[test]
fn introduction_mentions_age_and_consent() {
    let intro = build(&fixture()).sections[0].content.clone();
    assert!(intro[0].starts_with("Acme Co. (\"we\", \"our\", or \"us\")"));
    assert!(intro[0].contains("visit our website https://acme.example (the \"Site\")"));
    assert_eq!(
        intro[4],
        "Our Site is not intended for individuals under the age of 16 without parental consent, and we do not knowingly collect personal data from children."
    );

    let intro = build(&AnswersRecord::default()).sections[0].content.clone();
    assert!(intro[4].contains("under the age of 13, and"));
}

#[test]
fn empty_answers_fall_back_to_neutral_phrases() {
    let policy = build(&AnswersRecord::default());
    assert_eq!(policy.title, "Privacy Policy for ");
    assert!(policy.sections[0].content[0].starts_with("The operator of this website"));
    assert_eq!(policy.sections[9].content.len(), 2);
}

#[test]
fn text_preview_carries_notice_only_when_free() {
    let policy = build(&fixture());
    let free = render_text(&policy, false);
    assert!(free.starts_with("Privacy Policy for Acme Co.\nLast Updated: January 5, 2025"));
    assert!(free.ends_with(WATERMARK_TEXT));
    assert!(!render_text(&policy, true).contains(WATERMARK_TEXT));
}

#[test]
fn markdown_preview_renders_headings() {
    let policy = build(&fixture());
    let markdown = render_markdown(&policy, false).unwrap();
    assert!(markdown.starts_with("# Privacy Policy for Acme Co."));
    assert!(markdown.contains("## 8. Legal Compliance"));
    assert!(markdown.contains("\"we\", \"our\", or \"us\""));
    assert!(markdown.contains(WATERMARK_TEXT));
    assert!(!render_markdown(&policy, true).unwrap().contains(WATERMARK_TEXT));
}

#[test]
fn saved_policy_document_and_cbor() {
    let answers = fixture();
    let saved = SavedPolicy::new(build(&answers), answers);
    let document = saved.to_document();
    assert_eq!(document["policyType"], "privacy");
    assert_eq!(document["policyName"], "Privacy Policy for Acme Co.");
    assert_eq!(document["policy"]["lastUpdated"], "January 5, 2025");
    assert_eq!(document["answers"]["general"]["businessName"], "Acme Co.");

    let bytes = saved.to_cbor().unwrap();
    assert_eq!(SavedPolicy::from_cbor(&bytes).unwrap(), saved);
}
