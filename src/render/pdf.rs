//! PDF sink: question set → PDF bytes via printpdf.
//!
//! Uses the builtin Helvetica faces so no font files need to ship with the
//! crate. Layout is a single-column flow on A4: the cursor walks down the
//! page and a fresh page is started when it reaches the bottom margin.
//! Long lines are word-wrapped against a character budget derived from the
//! average Helvetica glyph width — crude, but stable and font-file-free.

use super::{render_into, DocumentSink};
use crate::error::SnapQuizError;
use crate::model::QuestionSet;
use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;

const TITLE_SIZE: f32 = 16.0;
const QUESTION_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 11.0;
const LINE_HEIGHT_MM: f32 = 6.0;

/// Wrap budget for body text at 11 pt Helvetica across the printable width.
const WRAP_COLS: usize = 88;

pub(super) fn render(set: &QuestionSet) -> Result<Vec<u8>, SnapQuizError> {
    let (doc, page, layer) =
        PdfDocument::new(&set.title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;

    let layer = doc.get_page(page).get_layer(layer);

    let mut sink = PdfSink {
        doc: &doc,
        layer,
        regular,
        bold,
        y: PAGE_HEIGHT_MM - MARGIN_MM,
    };
    render_into(set, &mut sink);

    doc.save_to_bytes().map_err(pdf_err)
}

fn pdf_err(e: printpdf::Error) -> SnapQuizError {
    SnapQuizError::RenderingFailed {
        format: "PDF",
        detail: e.to_string(),
    }
}

struct PdfSink<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Cursor: distance from the page bottom, in millimetres.
    y: f32,
}

impl PdfSink<'_> {
    /// Write one wrapped paragraph, breaking to a new page as needed.
    fn paragraph(&mut self, text: &str, size: f32, bold: bool, indent_mm: f32) {
        let font = if bold {
            self.bold.clone()
        } else {
            self.regular.clone()
        };
        // Shrink the wrap budget proportionally for indented/larger text.
        let cols = (WRAP_COLS as f32 * BODY_SIZE / size) as usize;
        for raw_line in text.lines() {
            for line in wrap(raw_line, cols.saturating_sub(indent_mm as usize / 2).max(20)) {
                if self.y < MARGIN_MM + LINE_HEIGHT_MM {
                    self.new_page();
                }
                self.layer.use_text(
                    line,
                    size,
                    Mm(MARGIN_MM + indent_mm),
                    Mm(self.y),
                    &font,
                );
                self.y -= LINE_HEIGHT_MM;
            }
        }
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }
}

impl DocumentSink for PdfSink<'_> {
    fn title(&mut self, title: &str, created_at: &DateTime<Utc>) {
        self.paragraph(title, TITLE_SIZE, true, 0.0);
        self.paragraph(
            &format!("Created: {}", created_at.format("%Y-%m-%d %H:%M")),
            BODY_SIZE,
            false,
            0.0,
        );
        self.gap(4.0);
    }

    fn begin_question(&mut self, number: usize, text: &str) {
        self.paragraph(&format!("{number}. {text}"), QUESTION_SIZE, true, 0.0);
    }

    fn option(&mut self, label: char, text: &str) {
        self.paragraph(&format!("{label}. {text}"), BODY_SIZE, false, 6.0);
    }

    fn answer(&mut self, text: &str) {
        self.paragraph(&format!("Answer: {text}"), BODY_SIZE, false, 3.0);
    }

    fn explanation(&mut self, text: &str) {
        self.paragraph(&format!("Explanation: {text}"), BODY_SIZE, false, 3.0);
    }

    fn end_question(&mut self) {
        self.gap(4.0);
    }
}

/// Greedy word wrap against a character budget. Words longer than the
/// budget are emitted on their own overlong line rather than split.
fn wrap(text: &str, cols: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= cols {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    #[test]
    fn wrap_respects_budget() {
        let lines = wrap("one two three four five six seven", 12);
        assert!(lines.iter().all(|l| l.chars().count() <= 12));
        assert_eq!(lines.join(" "), "one two three four five six seven");
    }

    #[test]
    fn wrap_keeps_overlong_word_whole() {
        let lines = wrap("supercalifragilistic", 5);
        assert_eq!(lines, vec!["supercalifragilistic"]);
    }

    #[test]
    fn wrap_of_empty_line_yields_one_blank() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn many_questions_span_pages_without_error() {
        let mut set = QuestionSet::new("stress");
        for i in 0..120 {
            let mut q = Question::general(format!("Question number {i}, padded with some extra words to take space?"));
            q.answer = "yes".into();
            set.add_question(q);
        }
        let bytes = render(&set).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
