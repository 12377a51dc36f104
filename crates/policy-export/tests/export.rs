use chrono::NaiveDate;

use policy_export::{ExportFormat, ExportOptions, export, render};
use policy_spec::{AnswersRecord, FixedClock, GeneratedPolicy, generate};

fn answers_for(name: &str) -> AnswersRecord {
    let mut answers = AnswersRecord::default();
    answers.general.business_name = name.into();
    answers.general.website_url = "https://acme.example".into();
    answers.general.contact_email = "privacy@acme.example".into();
    answers
}

fn policy_for(answers: &AnswersRecord) -> GeneratedPolicy {
    generate(
        answers,
        &FixedClock(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()),
    )
}

#[test]
fn formats_parse_case_insensitively() {
    assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
    assert_eq!("docx".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
    assert!("rtf".parse::<ExportFormat>().is_err());
    assert_eq!(ExportFormat::Docx.to_string(), "docx");
    assert_eq!(ExportFormat::Pdf.mime_type(), "application/pdf");
}

#[tokio::test]
async fn export_names_files_after_the_business() {
    let answers = answers_for("Acme Co.");
    let policy = policy_for(&answers);
    let name = &answers.general.business_name;
    let pdf = export(&policy, name, ExportFormat::Pdf, ExportOptions::free())
        .await
        .unwrap();
    assert_eq!(pdf.file_name, "acme-co.-privacy-policy.pdf");
    assert!(pdf.bytes.starts_with(b"%PDF"));

    let docx = export(&policy, name, ExportFormat::Docx, ExportOptions::paid())
        .await
        .unwrap();
    assert_eq!(docx.file_name, "acme-co.-privacy-policy.docx");
    // zip local file header
    assert!(docx.bytes.starts_with(b"PK\x03\x04"));
}

#[tokio::test]
async fn blank_name_keeps_the_slug_rule() {
    let answers = answers_for("   ");
    let policy = policy_for(&answers);
    assert_eq!(policy.title, "Privacy Policy for ");
    let export = export(
        &policy,
        &answers.general.business_name,
        ExportFormat::Docx,
        ExportOptions::free(),
    )
    .await
    .unwrap();
    assert_eq!(export.file_name, "-privacy-policy.docx");
}

#[tokio::test]
async fn name_is_trimmed_and_whitespace_collapsed() {
    let answers = answers_for("  Acme  Co.  ");
    let policy = policy_for(&answers);
    assert_eq!(policy.title, "Privacy Policy for Acme  Co.");
    let export = export(
        &policy,
        &answers.general.business_name,
        ExportFormat::Pdf,
        ExportOptions::paid(),
    )
    .await
    .unwrap();
    assert_eq!(export.file_name, "acme-co.-privacy-policy.pdf");
}

#[tokio::test]
async fn concurrent_exports_match_sync_render() {
    let policy = policy_for(&answers_for("Acme Co."));
    let options = ExportOptions::free();
    let (pdf, docx) = tokio::join!(
        export(&policy, "Acme Co.", ExportFormat::Pdf, options),
        export(&policy, "Acme Co.", ExportFormat::Docx, options),
    );
    assert_eq!(
        pdf.unwrap().bytes,
        render(&policy, ExportFormat::Pdf, options).unwrap()
    );
    assert_eq!(
        docx.unwrap().bytes,
        render(&policy, ExportFormat::Docx, options).unwrap()
    );
}

#[tokio::test]
async fn write_to_creates_the_directory() {
    let temp = tempfile::tempdir().unwrap();
    let out = temp.path().join("nested").join("out");
    let policy = policy_for(&answers_for("Acme Co."));
    let export = export(&policy, "Acme Co.", ExportFormat::Pdf, ExportOptions::paid())
        .await
        .unwrap();
    let path = export.write_to(&out).await.unwrap();
    assert_eq!(path, out.join("acme-co.-privacy-policy.pdf"));
    assert_eq!(std::fs::read(path).unwrap(), export.bytes);
}
