//! Question set assembly: parsed records → titled, timestamped aggregate.
//!
//! This is the point where an empty extraction stops being a quiet empty
//! vector and becomes a reported error. The parser downstream of the model
//! never fails on its own; the assembler is the gatekeeper that refuses to
//! let a question-less set reach the store.

use crate::error::SnapQuizError;
use crate::model::{Question, QuestionSet};
use chrono::Utc;
use tracing::info;

/// Title used for sets extracted from a pasted (clipboard) image.
pub const PASTED_IMAGE_TITLE: &str = "Pasted Image";

/// Title for an uploaded file, e.g. `"Uploaded Image: quiz.png"`.
pub fn upload_title(filename: Option<&str>) -> String {
    format!("Uploaded Image: {}", filename.unwrap_or("Unnamed"))
}

/// Wrap parsed questions into a [`QuestionSet`] ready for persistence.
///
/// Fails with [`SnapQuizError::NoQuestionsExtracted`] when `questions` is
/// empty. On success the set owns every question (extraction order
/// preserved) and carries a fresh `created_at` stamp; the store assigns
/// the identifier later.
pub fn assemble(
    title: impl Into<String>,
    questions: Vec<Question>,
) -> Result<QuestionSet, SnapQuizError> {
    if questions.is_empty() {
        return Err(SnapQuizError::NoQuestionsExtracted);
    }

    let mut set = QuestionSet {
        id: 0,
        title: title.into(),
        created_at: Utc::now(),
        questions: Vec::with_capacity(questions.len()),
    };
    for question in questions {
        set.add_question(question);
    }

    info!("Assembled '{}' with {} question(s)", set.title, set.len());
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionType;

    #[test]
    fn empty_extraction_is_an_error() {
        let err = assemble("Pasted Image", vec![]).unwrap_err();
        assert!(matches!(err, SnapQuizError::NoQuestionsExtracted));
        assert!(err.is_client_error());
    }

    #[test]
    fn assembled_set_owns_questions_in_order() {
        let qs = vec![
            Question::general("first"),
            Question::multiple_choice("second", vec!["a".into(), "b".into()]),
        ];
        let set = assemble("Uploaded Image: test.png", qs).unwrap();

        assert_eq!(set.id, 0);
        assert_eq!(set.title, "Uploaded Image: test.png");
        assert_eq!(set.len(), 2);
        assert_eq!(set.questions[0].text, "first");
        assert_eq!(set.questions[1].kind, QuestionType::MultipleChoice);
        // created_at is a real, recent stamp.
        let age = Utc::now() - set.created_at;
        assert!(age.num_seconds() >= 0 && age.num_seconds() < 60);
    }

    #[test]
    fn upload_title_formats() {
        assert_eq!(upload_title(Some("quiz.png")), "Uploaded Image: quiz.png");
        assert_eq!(upload_title(None), "Uploaded Image: Unnamed");
    }
}
