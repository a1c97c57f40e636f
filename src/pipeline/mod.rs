//! Pipeline stages for screenshot-to-question-set extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! normalize ──▶ extract ──▶ parse ──▶ assemble
//! (bytes/b64)   (VLM call)  (text →    (titled,
//!                            records)   timestamped set)
//! ```
//!
//! 1. [`normalize`] — canonicalise an upload or pasted base64 string into
//!    bytes + media type; the only stage that can reject input outright
//! 2. [`extract`]  — drive the single vision call under a timeout; the only
//!    stage with network I/O
//! 3. [`parse`]    — turn the model's free-form text into ordered
//!    [`crate::Question`] records; pure in its one text input
//! 4. [`assemble`] — wrap the records into a [`crate::QuestionSet`]
//!    aggregate, turning an empty extraction into a reported error
//!
//! Stages run strictly sequentially: each depends on the previous stage's
//! full output, so there is nothing to parallelise within one request.

pub mod assemble;
pub mod extract;
pub mod normalize;
pub mod parse;
