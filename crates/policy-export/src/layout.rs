//! Page layout for the PDF export, in millimetres from the top-left corner.

use policy_spec::GeneratedPolicy;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 20.0;
/// The cursor moves to a new page once it passes this line.
pub const PAGE_BREAK_MM: f32 = 270.0;
pub const TEXT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

pub const TITLE_SIZE: f32 = 18.0;
pub const UPDATED_SIZE: f32 = 10.0;
pub const HEADING_SIZE: f32 = 14.0;
pub const BODY_SIZE: f32 = 12.0;

const LINE_ADVANCE_MM: f32 = 6.0;
const PARAGRAPH_GAP_MM: f32 = 4.0;
const SECTION_GAP_MM: f32 = 5.0;

/// Points per millimetre.
pub const SCALE: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub style: FontStyle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub runs: Vec<TextRun>,
}

// Helvetica advance widths (1/1000 em) for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const DEFAULT_WIDTH: u16 = 556;

fn char_width(ch: char, style: FontStyle) -> u16 {
    let table = match style {
        FontStyle::Bold => &HELVETICA_BOLD,
        // Oblique shares the upright metrics.
        FontStyle::Regular | FontStyle::Italic => &HELVETICA,
    };
    (ch as usize)
        .checked_sub(32)
        .and_then(|idx| table.get(idx))
        .copied()
        .unwrap_or(DEFAULT_WIDTH)
}

/// Rendered width of `text` in millimetres.
pub fn text_width_mm(text: &str, size: f32, style: FontStyle) -> f32 {
    let units: u32 = text.chars().map(|ch| u32::from(char_width(ch, style))).sum();
    units as f32 / 1000.0 * size / SCALE
}

/// Greedy word wrap. Words wider than a full line are split by character.
pub fn wrap_text(text: &str, max_width_mm: f32, size: f32, style: FontStyle) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if text_width_mm(&candidate, size, style) <= max_width_mm {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width_mm(word, size, style) <= max_width_mm {
                current = word.to_string();
            } else {
                for ch in word.chars() {
                    current.push(ch);
                    if text_width_mm(&current, size, style) > max_width_mm {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(ch);
                    }
                }
            }
        }
        lines.push(current);
    }
    lines
}

struct Cursor {
    pages: Vec<LaidOutPage>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![LaidOutPage::default()],
            y: MARGIN_MM,
        }
    }

    fn break_if_needed(&mut self) {
        if self.y > PAGE_BREAK_MM {
            self.pages.push(LaidOutPage::default());
            self.y = MARGIN_MM;
        }
    }

    fn put(&mut self, text: impl Into<String>, x: f32, size: f32, style: FontStyle) {
        let run = TextRun {
            text: text.into(),
            x,
            y: self.y,
            size,
            style,
        };
        if let Some(page) = self.pages.last_mut() {
            page.runs.push(run);
        }
    }
}

/// Lays the policy out on A4 pages.
pub fn layout(policy: &GeneratedPolicy) -> Vec<LaidOutPage> {
    let mut cursor = Cursor::new();

    let title_width = text_width_mm(&policy.title, TITLE_SIZE, FontStyle::Bold);
    cursor.put(
        policy.title.clone(),
        (PAGE_WIDTH_MM - title_width) / 2.0,
        TITLE_SIZE,
        FontStyle::Bold,
    );
    cursor.y += 15.0;

    cursor.put(
        format!("Last Updated: {}", policy.last_updated),
        MARGIN_MM,
        UPDATED_SIZE,
        FontStyle::Italic,
    );
    cursor.y += 15.0;

    for section in &policy.sections {
        cursor.break_if_needed();
        cursor.put(
            section.heading.clone(),
            MARGIN_MM,
            HEADING_SIZE,
            FontStyle::Bold,
        );
        cursor.y += 10.0;

        for paragraph in &section.content {
            for line in wrap_text(paragraph, TEXT_WIDTH_MM, BODY_SIZE, FontStyle::Regular) {
                cursor.break_if_needed();
                cursor.put(line, MARGIN_MM, BODY_SIZE, FontStyle::Regular);
                cursor.y += LINE_ADVANCE_MM;
            }
            cursor.y += PARAGRAPH_GAP_MM;
        }
        cursor.y += SECTION_GAP_MM;
    }

    cursor.pages
}
