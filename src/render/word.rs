//! Word sink: question set → OpenXML (docx) bytes via docx-rs.
//!
//! The docx builder accumulates paragraphs and packs the final ZIP
//! container in one shot, so unlike the PDF sink there is no cursor or
//! page-break bookkeeping here — Word reflows its own pages. Sizes are in
//! half-points (docx convention): 32 = 16 pt.

use super::{render_into, DocumentSink};
use crate::error::SnapQuizError;
use crate::model::QuestionSet;
use chrono::{DateTime, Utc};
use docx_rs::{Docx, Paragraph, Run};

const TITLE_HALF_POINTS: usize = 32;
const QUESTION_HALF_POINTS: usize = 24;
const BODY_HALF_POINTS: usize = 22;

pub(super) fn render(set: &QuestionSet) -> Result<Vec<u8>, SnapQuizError> {
    let mut sink = WordSink { docx: Docx::new() };
    render_into(set, &mut sink);

    let mut cursor = std::io::Cursor::new(Vec::new());
    sink.docx
        .build()
        .pack(&mut cursor)
        .map_err(|e| SnapQuizError::RenderingFailed {
            format: "DOCX",
            detail: e.to_string(),
        })?;
    Ok(cursor.into_inner())
}

struct WordSink {
    docx: Docx,
}

impl WordSink {
    fn push(&mut self, text: &str, half_points: usize, bold: bool) {
        // docx paragraphs cannot contain newlines; split into runs of
        // separate paragraphs so multi-line answers survive.
        for line in text.split('\n') {
            let mut run = Run::new().add_text(line).size(half_points);
            if bold {
                run = run.bold();
            }
            let paragraph = Paragraph::new().add_run(run);
            self.docx = std::mem::take(&mut self.docx).add_paragraph(paragraph);
        }
    }

    fn blank_line(&mut self) {
        self.docx = std::mem::take(&mut self.docx).add_paragraph(Paragraph::new());
    }
}

impl DocumentSink for WordSink {
    fn title(&mut self, title: &str, created_at: &DateTime<Utc>) {
        self.push(title, TITLE_HALF_POINTS, true);
        self.push(
            &format!("Created: {}", created_at.format("%Y-%m-%d %H:%M")),
            BODY_HALF_POINTS,
            false,
        );
        self.blank_line();
    }

    fn begin_question(&mut self, number: usize, text: &str) {
        self.push(&format!("{number}. {text}"), QUESTION_HALF_POINTS, true);
    }

    fn option(&mut self, label: char, text: &str) {
        self.push(&format!("    {label}. {text}"), BODY_HALF_POINTS, false);
    }

    fn answer(&mut self, text: &str) {
        self.push(&format!("Answer: {text}"), BODY_HALF_POINTS, false);
    }

    fn explanation(&mut self, text: &str) {
        self.push(&format!("Explanation: {text}"), BODY_HALF_POINTS, false);
    }

    fn end_question(&mut self) {
        self.blank_line();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    #[test]
    fn multiline_answer_splits_into_paragraphs() {
        let mut set = QuestionSet::new("Pasted Image");
        let mut q = Question::general("Prove it.");
        q.answer = "line one\nline two".into();
        set.add_question(q);
        // Must not panic or error; the ZIP header is checked in render tests.
        let bytes = render(&set).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
