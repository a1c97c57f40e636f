//! Document rendering: a persisted question set → PDF or Word bytes.
//!
//! ## One traversal, two sinks
//!
//! PDF and Word outputs must be content-equivalent: every question in
//! stored order, fields always in the order
//! question → options → answer → explanation. Duplicating that walk per
//! format invites drift, so the traversal lives in exactly one place
//! ([`render_into`]) and each output format implements [`DocumentSink`] —
//! a flat event interface the walker drives. A sink decides styling; it
//! cannot reorder or skip content.
//!
//! Rendering is CPU-bound and synchronous. Callers serving concurrent
//! requests should wrap these functions in `tokio::task::spawn_blocking`
//! so a large set cannot stall an async worker thread.

mod pdf;
mod word;

use crate::error::SnapQuizError;
use crate::model::{QuestionSet, QuestionType};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Receiver for the fixed rendering event sequence.
///
/// The walker calls, per set: `title`, then for each question
/// `begin_question` → zero or more `option` → `answer`? → `explanation`? →
/// `end_question`. Empty answer/explanation fields are skipped entirely
/// rather than rendered as bare labels.
pub(crate) trait DocumentSink {
    fn title(&mut self, title: &str, created_at: &DateTime<Utc>);
    fn begin_question(&mut self, number: usize, text: &str);
    fn option(&mut self, label: char, text: &str);
    fn answer(&mut self, text: &str);
    fn explanation(&mut self, text: &str);
    fn end_question(&mut self);
}

/// Walk the set in stored order, driving the sink.
///
/// This function is the single owner of the field-ordering contract; both
/// output formats are content-equivalent because both are driven from here.
pub(crate) fn render_into<S: DocumentSink>(set: &QuestionSet, sink: &mut S) {
    sink.title(&set.title, &set.created_at);

    for (i, q) in set.questions.iter().enumerate() {
        sink.begin_question(i + 1, &q.text);

        // Options are rendered for multiple choice only; a GENERAL question
        // has none by construction.
        if q.kind == QuestionType::MultipleChoice {
            for (j, opt) in q.options.iter().enumerate() {
                sink.option(option_label(j), opt);
            }
        }

        if !q.answer.is_empty() {
            sink.answer(&q.answer);
        }
        if !q.explanation.is_empty() {
            sink.explanation(&q.explanation);
        }

        sink.end_question();
    }
}

/// Letter label for the option at `index`: A, B, C, …
fn option_label(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}

/// Render the set as a PDF byte stream.
pub fn render_pdf(set: &QuestionSet) -> Result<Vec<u8>, SnapQuizError> {
    debug!("Rendering PDF for set {} ({} questions)", set.id, set.len());
    pdf::render(set)
}

/// Render the set as a Word (OpenXML) byte stream.
pub fn render_word(set: &QuestionSet) -> Result<Vec<u8>, SnapQuizError> {
    debug!("Rendering DOCX for set {} ({} questions)", set.id, set.len());
    word::render(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    /// A sink that records the raw event stream, used to pin the
    /// traversal contract independently of any binary format.
    #[derive(Default)]
    struct RecordingSink {
        events: Vec<String>,
    }

    impl DocumentSink for RecordingSink {
        fn title(&mut self, title: &str, _created_at: &DateTime<Utc>) {
            self.events.push(format!("title:{title}"));
        }
        fn begin_question(&mut self, number: usize, text: &str) {
            self.events.push(format!("q{number}:{text}"));
        }
        fn option(&mut self, label: char, text: &str) {
            self.events.push(format!("opt:{label}:{text}"));
        }
        fn answer(&mut self, text: &str) {
            self.events.push(format!("ans:{text}"));
        }
        fn explanation(&mut self, text: &str) {
            self.events.push(format!("exp:{text}"));
        }
        fn end_question(&mut self) {
            self.events.push("end".into());
        }
    }

    fn sample_set() -> QuestionSet {
        let mut set = QuestionSet::new("Uploaded Image: test.png");
        set.id = 3;
        let mut mc = Question::multiple_choice("What is 2+2?", vec!["3".into(), "4".into()]);
        mc.answer = "B".into();
        mc.explanation = "Basic arithmetic.".into();
        set.add_question(mc);
        let mut gen = Question::general("Define entropy.");
        gen.answer = "A measure of disorder.".into();
        set.add_question(gen);
        set
    }

    #[test]
    fn walker_emits_fields_in_contract_order() {
        let set = sample_set();
        let mut sink = RecordingSink::default();
        render_into(&set, &mut sink);

        assert_eq!(
            sink.events,
            vec![
                "title:Uploaded Image: test.png",
                "q1:What is 2+2?",
                "opt:A:3",
                "opt:B:4",
                "ans:B",
                "exp:Basic arithmetic.",
                "end",
                "q2:Define entropy.",
                "ans:A measure of disorder.",
                "end",
            ]
        );
    }

    #[test]
    fn general_question_emits_no_options() {
        let mut set = QuestionSet::new("Pasted Image");
        set.add_question(Question::general("Why?"));
        let mut sink = RecordingSink::default();
        render_into(&set, &mut sink);
        assert!(!sink.events.iter().any(|e| e.starts_with("opt:")));
        // Empty answer/explanation are skipped, not rendered as labels.
        assert!(!sink.events.iter().any(|e| e.starts_with("ans:")));
    }

    #[test]
    fn option_labels_are_letters() {
        assert_eq!(option_label(0), 'A');
        assert_eq!(option_label(3), 'D');
        assert_eq!(option_label(25), 'Z');
    }

    #[test]
    fn pdf_output_has_magic_bytes() {
        let bytes = render_pdf(&sample_set()).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "not a PDF header");
        assert!(bytes.len() > 500);
    }

    #[test]
    fn word_output_is_a_zip_container() {
        let bytes = render_word(&sample_set()).unwrap();
        // OpenXML documents are ZIP archives.
        assert!(bytes.starts_with(b"PK"), "not a ZIP container");
        assert!(bytes.len() > 500);
    }

    #[test]
    fn word_output_carries_the_text_literally() {
        // docx-rs stores document.xml uncompressed, so the question fields
        // are findable raw in the container bytes.
        let bytes = render_word(&sample_set()).unwrap();
        for needle in ["What is 2+2?", "Basic arithmetic.", "Define entropy."] {
            let needle = needle.as_bytes();
            assert!(
                bytes.windows(needle.len()).any(|w| w == needle),
                "{:?} missing from DOCX bytes",
                String::from_utf8_lossy(needle)
            );
        }
    }

    #[test]
    fn both_formats_render_nonempty_for_minimal_set() {
        let mut set = QuestionSet::new("Pasted Image");
        set.add_question(Question::general("Lone question?"));
        assert!(!render_pdf(&set).unwrap().is_empty());
        assert!(!render_word(&set).unwrap().is_empty());
    }
}
