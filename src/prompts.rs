//! The extraction instruction prompt sent alongside every screenshot.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tightening the output convention (which
//!    the parser in [`crate::pipeline::parse`] depends on) requires editing
//!    exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the prompt directly without
//!    spinning up a real VLM.
//!
//! Callers can override the default via
//! [`crate::config::ExtractionConfig::system_prompt`]; the constant here is
//! used only when no override is provided. The parser does NOT assume the
//! model obeys these rules — it tolerates drift — but a well-behaved model
//! following them produces the cleanest extraction.

/// Default instruction prompt for extracting questions from a screenshot.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an expert at reading quiz and exam screenshots. The image contains one or more questions. Transcribe every question you can see into plain text.

Follow these rules precisely:

1. NUMBERING
   - Number the questions 1. 2. 3. in the order they appear in the image
   - Start each question on a new line

2. OPTIONS
   - For multiple-choice questions, list each option on its own line as A) B) C) D)
   - For questions without options, write only the question text

3. ANSWER
   - After the options, add a line starting with "Answer:" giving the correct
     option letter and, when helpful, the option text
   - For open questions, give the correct answer in full after "Answer:"

4. EXPLANATION
   - Add a line starting with "Explanation:" with a short rationale
   - Omit the line if no explanation can be given

5. OUTPUT FORMAT
   - Output ONLY the transcribed questions in the format above
   - Do NOT wrap the output in code fences
   - Do NOT add commentary, headings, or summaries
   - If the image contains no questions at all, output nothing"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_field_markers_the_parser_expects() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains("Answer:"));
        assert!(DEFAULT_SYSTEM_PROMPT.contains("Explanation:"));
        assert!(DEFAULT_SYSTEM_PROMPT.contains("A) B) C) D)"));
    }
}
