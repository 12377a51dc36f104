use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};
use policy_spec::GeneratedPolicy;
use tracing::debug;

use crate::error::{ExportError, pdf_error};
use crate::layout::{FontStyle, LaidOutPage, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, SCALE, layout};
use crate::options::{ExportOptions, WATERMARK_TEXT};

const WATERMARK_SIZE: f32 = 12.0;
const WATERMARK_X_MM: f32 = 30.0;
const WATERMARK_Y_MM: f32 = 150.0;
const WATERMARK_ANGLE_DEG: f32 = 45.0;
const WATERMARK_GRAY: f32 = 200.0 / 255.0;

fn font_resource(style: FontStyle) -> &'static str {
    match style {
        FontStyle::Regular => "F1",
        FontStyle::Bold => "F2",
        FontStyle::Italic => "F3",
    }
}

/// Characters WinAnsiEncoding places in 0x80..=0x9F, where Latin-1 has
/// control codes.
const WIN_ANSI_EXTRAS: [(char, u8); 27] = [
    ('€', 0x80),
    ('‚', 0x82),
    ('ƒ', 0x83),
    ('„', 0x84),
    ('…', 0x85),
    ('†', 0x86),
    ('‡', 0x87),
    ('ˆ', 0x88),
    ('‰', 0x89),
    ('Š', 0x8A),
    ('‹', 0x8B),
    ('Œ', 0x8C),
    ('Ž', 0x8E),
    ('‘', 0x91),
    ('’', 0x92),
    ('“', 0x93),
    ('”', 0x94),
    ('•', 0x95),
    ('–', 0x96),
    ('—', 0x97),
    ('˜', 0x98),
    ('™', 0x99),
    ('š', 0x9A),
    ('›', 0x9B),
    ('œ', 0x9C),
    ('ž', 0x9E),
    ('Ÿ', 0x9F),
];

fn win_ansi_byte(c: char) -> u8 {
    if let Some((_, byte)) = WIN_ANSI_EXTRAS.iter().find(|(ch, _)| *ch == c) {
        return *byte;
    }
    match c as u32 {
        0x80..=0x9F => b'?',
        code @ 0..=0xFF => code as u8,
        _ => b'?',
    }
}

fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars().map(win_ansi_byte).collect()
}

fn literal(text: &str) -> Object {
    Object::String(to_win_ansi(text), StringFormat::Literal)
}

fn font_object(doc: &mut Document, base: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    })
}

fn page_content(page: &LaidOutPage, watermark: bool) -> Content {
    let page_height = PAGE_HEIGHT_MM * SCALE;
    let mut operations = Vec::new();

    for run in &page.runs {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(font_resource(run.style).as_bytes().to_vec()),
                run.size.into(),
            ],
        ));
        operations.push(Operation::new("rg", vec![0.into(), 0.into(), 0.into()]));
        operations.push(Operation::new(
            "Td",
            vec![(run.x * SCALE).into(), (page_height - run.y * SCALE).into()],
        ));
        operations.push(Operation::new("Tj", vec![literal(&run.text)]));
        operations.push(Operation::new("ET", vec![]));
    }

    if watermark {
        let (sin, cos) = WATERMARK_ANGLE_DEG.to_radians().sin_cos();
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(font_resource(FontStyle::Italic).as_bytes().to_vec()),
                WATERMARK_SIZE.into(),
            ],
        ));
        operations.push(Operation::new(
            "rg",
            vec![
                WATERMARK_GRAY.into(),
                WATERMARK_GRAY.into(),
                WATERMARK_GRAY.into(),
            ],
        ));
        operations.push(Operation::new(
            "Tm",
            vec![
                cos.into(),
                sin.into(),
                (-sin).into(),
                cos.into(),
                (WATERMARK_X_MM * SCALE).into(),
                (page_height - WATERMARK_Y_MM * SCALE).into(),
            ],
        ));
        operations.push(Operation::new("Tj", vec![literal(WATERMARK_TEXT)]));
        operations.push(Operation::new("ET", vec![]));
    }

    Content { operations }
}

/// Renders the policy as an A4 PDF using the standard Helvetica faces.
pub fn render_pdf(policy: &GeneratedPolicy, options: ExportOptions) -> Result<Vec<u8>, ExportError> {
    let pages = layout(policy);
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = font_object(&mut doc, "Helvetica");
    let bold = font_object(&mut doc, "Helvetica-Bold");
    let italic = font_object(&mut doc, "Helvetica-Oblique");
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
            "F3" => italic,
        },
    });

    let media_box = vec![
        0.into(),
        0.into(),
        (PAGE_WIDTH_MM * SCALE).into(),
        (PAGE_HEIGHT_MM * SCALE).into(),
    ];

    let mut kids = Vec::with_capacity(pages.len());
    for page in &pages {
        let content = page_content(page, options.watermarked());
        let stream = Stream::new(dictionary! {}, content.encode().map_err(pdf_error)?);
        let content_id = doc.add_object(stream);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box.clone(),
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => literal(&policy.title),
        "Producer" => literal("policygen"),
    });
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(pdf_error)?;
    debug!(pages = pages.len(), bytes = bytes.len(), "rendered pdf");
    Ok(bytes)
}
