use std::io::{Cursor, Read};

use chrono::NaiveDate;
use zip::ZipArchive;

use policy_export::{Alignment, ExportOptions, WATERMARK_TEXT, docx_blocks, render_docx};
use policy_spec::{AnswersRecord, FixedClock, GeneratedPolicy, generate};

fn sample_policy() -> GeneratedPolicy {
    let mut answers = AnswersRecord::default();
    answers.general.business_name = "Acme & Sons".into();
    answers.general.website_url = "https://acme.example".into();
    answers.general.contact_email = "privacy@acme.example".into();
    answers.collection.collects_personal_info = true;
    answers.collection.name = true;
    answers.storage.security_measures = "TLS everywhere".into();
    generate(
        &answers,
        &FixedClock(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()),
    )
}

fn document_xml(bytes: &[u8]) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut entry = archive.by_name("word/document.xml").unwrap();
    let mut xml = String::new();
    entry.read_to_string(&mut xml).unwrap();
    xml
}

#[test]
fn package_has_required_parts() {
    let bytes = render_docx(&sample_policy(), ExportOptions::paid()).unwrap();
    let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    let names: Vec<&str> = archive.file_names().collect();
    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/document.xml",
        "word/_rels/document.xml.rels",
        "word/styles.xml",
    ] {
        assert!(names.contains(&part), "missing {part}");
    }
}

#[test]
fn watermark_only_in_free_exports() {
    let policy = sample_policy();

    let free = document_xml(&render_docx(&policy, ExportOptions::free()).unwrap());
    assert!(free.contains(WATERMARK_TEXT));
    assert!(free.contains(r#"<w:color w:val="CCCCCC"/>"#));

    let paid = document_xml(&render_docx(&policy, ExportOptions::paid()).unwrap());
    assert!(!paid.contains(WATERMARK_TEXT));
}

#[test]
fn document_text_is_escaped() {
    let xml = document_xml(&render_docx(&sample_policy(), ExportOptions::paid()).unwrap());
    assert!(xml.contains("Privacy Policy for Acme &amp; Sons"));
    assert!(xml.contains("Last Updated: March 14, 2025"));
    assert!(xml.contains(r#"<w:pStyle w:val="Heading2"/>"#));
}

#[test]
fn block_structure_follows_the_policy() {
    let policy = sample_policy();
    let blocks = docx_blocks(&policy, ExportOptions::free());

    let title = &blocks[0];
    assert_eq!(title.text, policy.title);
    assert_eq!(title.style, Some("Title"));
    assert_eq!(title.alignment, Some(Alignment::Center));

    let updated = &blocks[1];
    assert_eq!(updated.space_after, Some(400));

    let heading = &blocks[2];
    assert_eq!(heading.text, "1. Introduction");
    assert_eq!(heading.style, Some("Heading2"));
    assert_eq!((heading.space_before, heading.space_after), (Some(400), Some(200)));

    let body = &blocks[3];
    assert_eq!(body.style, None);
    assert_eq!(body.space_after, Some(200));

    let paragraphs: usize = policy.sections.iter().map(|s| s.content.len()).sum();
    assert_eq!(blocks.len(), 2 + policy.sections.len() + paragraphs + 1);

    let watermark = blocks.last().unwrap();
    assert_eq!(watermark.text, WATERMARK_TEXT);
    assert_eq!(watermark.space_before, Some(800));
    assert!(watermark.italic);
    assert_eq!(watermark.color, Some("CCCCCC"));
}

#[test]
fn output_is_deterministic() {
    let policy = sample_policy();
    let first = render_docx(&policy, ExportOptions::free()).unwrap();
    let second = render_docx(&policy, ExportOptions::free()).unwrap();
    assert_eq!(first, second);
}
