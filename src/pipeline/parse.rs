//! Response parsing: free-form model text → ordered question records.
//!
//! ## Why a grammar of regexes and not deserialization?
//!
//! The model's output has no enforced schema. Asking for JSON trades one
//! failure mode for a worse one (truncated or mis-escaped JSON loses the
//! whole response); semi-structured text degrades per-field instead. So the
//! raw text is treated as untyped input to a small segmentation grammar:
//! question-head lines open blocks, marker lines claim fields inside a
//! block, and every field is extracted independently — a missing or
//! garbled field in one block can never corrupt its neighbours.
//!
//! The parser is a pure function of its single text input: no I/O, no
//! hidden state, same ordered output on every call. That makes it the one
//! well-tested point of contact with model-output variability.
//!
//! ## Tolerated drift
//!
//! - `1.` / `2)` / `Q3.` / `Question 4:` question heads, with or without
//!   `**` emphasis
//! - `A)` `b.` `(C)` `3)` or bullet (`-`, `*`, `•`) option markers
//! - `Answer:` / `Correct answer:` and `Explanation:` / `Rationale:` labels
//! - CRLF line endings, an outer markdown fence, invisible Unicode
//! - no numbering at all: blocks fall back to blank-line segmentation, but
//!   a fallback paragraph must show some question signal (an option line,
//!   a marker line, or a `?`) — conversational prose is discarded
//!
//! Numeric option markers are recognised with `)` only — a bare `1.` prefix
//! always opens a new question block.

use crate::model::{
    truncate_chars, Question, QuestionType, MAX_ANSWER_LEN, MAX_EXPLANATION_LEN, MAX_TEXT_LEN,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_QUESTION_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\*\*)?(?:[Qq](?:uestion)?\s*)?\d{1,3}([.)：:])(?:\*\*)?\s*(.*?)(?:\*\*)?\s*$")
        .unwrap()
});

static RE_OPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\*\*)?(?:[A-Da-d][.)]|\([A-Da-d]\)|[1-9]\)|[-*•])\s+(.*?)(?:\*\*)?\s*$")
        .unwrap()
});

// Bold labels come both ways: `**Answer: B**` and `**Answer:** B` — the
// optional `**` after the colon handles the second.
static RE_ANSWER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:\*\*)?(?:correct\s+)?answer\s*[:：](?:\*\*)?\s*(.*?)(?:\*\*)?\s*$")
        .unwrap()
});

static RE_EXPLANATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:\*\*)?(?:explanation|rationale)\s*[:：](?:\*\*)?\s*(.*?)(?:\*\*)?\s*$")
        .unwrap()
});

static RE_OUTER_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[a-zA-Z]*\n(.*)\n```\s*$").unwrap());

/// Parse raw model output into an ordered sequence of questions.
///
/// Returns an empty vector when no valid block is found; the empty-result
/// error decision belongs to the assembler, not here.
pub fn parse(raw: &str) -> Vec<Question> {
    let cleaned = remove_invisible_chars(&normalise_line_endings(&strip_outer_fence(raw)));
    let lines: Vec<&str> = cleaned.lines().collect();

    let blocks = segment(&lines);
    let questions: Vec<Question> = blocks
        .into_iter()
        .filter_map(|block| extract_block(&block))
        .collect();

    debug!("Parsed {} question(s) from {} line(s)", questions.len(), lines.len());
    questions
}

// ── Pre-pass (same rules the raw output always needs) ────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn strip_outer_fence(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCE.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Segmentation ─────────────────────────────────────────────────────────

/// Split lines into per-question blocks.
///
/// Primary heuristic: every question-head line (`1.`, `Q2)`, `Question 3:`)
/// opens a new block; preamble lines before the first head are discarded.
/// Fallback when no head line exists anywhere: blank-line-separated
/// paragraphs, each treated as one block.
///
/// Numeric heads and numeric option markers collide on `N)`. The document's
/// head separator is locked from the first head line that does not use `)`
/// (falling back to `)` when nothing else exists), so `1.`-numbered
/// questions can still carry `1) 2) 3)` option lists.
fn segment<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let head_sep = head_separator(lines);

    let mut blocks: Vec<Vec<&str>> = Vec::new();
    if let Some(sep) = head_sep {
        let mut current: Option<Vec<&str>> = None;
        for line in lines {
            if is_head(line, sep) {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
                current = Some(vec![line]);
            } else if let Some(ref mut block) = current {
                block.push(line);
            }
            // Lines before the first head ("Here are the questions:" etc.)
            // belong to no block and are dropped.
        }
        if let Some(block) = current {
            blocks.push(block);
        }
    } else {
        let mut current: Vec<&str> = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                if !current.is_empty() && looks_like_question(&current) {
                    blocks.push(std::mem::take(&mut current));
                }
                current.clear();
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() && looks_like_question(&current) {
            blocks.push(current);
        }
    }
    blocks
}

/// Whether an unnumbered paragraph plausibly contains a question at all.
///
/// Conversational output ("The image appears to show a cat…", refusals)
/// has no head line and would otherwise sail through the fallback as a
/// bogus GENERAL question. A paragraph qualifies only when it carries some
/// question signal: an option line, an answer or explanation marker, or a
/// line ending in `?`.
fn looks_like_question(lines: &[&str]) -> bool {
    lines.iter().any(|line| {
        RE_OPTION.is_match(line)
            || RE_ANSWER.is_match(line)
            || RE_EXPLANATION.is_match(line)
            || line.trim_end().ends_with('?')
    })
}

/// The separator character of the document's question heads, or `None`
/// when no line matches the head pattern at all (fallback segmentation).
fn head_separator(lines: &[&str]) -> Option<char> {
    let mut paren_seen = false;
    for line in lines {
        if let Some(caps) = RE_QUESTION_HEAD.captures(line) {
            let sep = caps[1].chars().next().unwrap_or('.');
            if sep == ')' {
                paren_seen = true;
            } else {
                return Some(sep);
            }
        }
    }
    paren_seen.then_some(')')
}

fn is_head(line: &str, sep: char) -> bool {
    RE_QUESTION_HEAD
        .captures(line)
        .is_some_and(|caps| caps[1].chars().next() == Some(sep))
}

// ── Per-block field extraction ───────────────────────────────────────────

/// Which field a bare continuation line should extend.
#[derive(Clone, Copy, PartialEq)]
enum Field {
    Text,
    Option,
    Answer,
    Explanation,
    None,
}

/// Extract the four fields from one block, independently of any other
/// block. Returns `None` when no question text survives (the block is
/// dropped, not emitted as an empty record).
fn extract_block(lines: &[&str]) -> Option<Question> {
    let mut text_parts: Vec<String> = Vec::new();
    let mut options: Vec<String> = Vec::new();
    let mut answer_parts: Vec<String> = Vec::new();
    let mut explanation_parts: Vec<String> = Vec::new();
    let mut last = Field::None;

    for (i, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            // A blank line ends whatever was being continued.
            last = Field::None;
            continue;
        }

        // The head line's remainder (after "1.") starts the question text.
        if i == 0 {
            if let Some(caps) = RE_QUESTION_HEAD.captures(line) {
                let rest = caps[2].trim().to_string();
                if !rest.is_empty() {
                    text_parts.push(rest);
                }
                last = Field::Text;
                continue;
            }
        }

        if let Some(caps) = RE_ANSWER.captures(line) {
            answer_parts.push(caps[1].trim().to_string());
            last = Field::Answer;
        } else if let Some(caps) = RE_EXPLANATION.captures(line) {
            explanation_parts.push(caps[1].trim().to_string());
            last = Field::Explanation;
        } else if let Some(caps) = RE_OPTION.captures(line) {
            options.push(caps[1].trim().to_string());
            last = Field::Option;
        } else {
            // Continuation of the most recent field; before any marker the
            // line extends the question text.
            match last {
                Field::Answer => answer_parts.push(line.trim().to_string()),
                Field::Explanation => explanation_parts.push(line.trim().to_string()),
                Field::Option => {
                    if let Some(opt) = options.last_mut() {
                        opt.push(' ');
                        opt.push_str(line.trim());
                    }
                }
                Field::Text | Field::None => {
                    text_parts.push(line.trim().to_string());
                    last = Field::Text;
                }
            }
        }
    }

    // Classification: two or more option lines make it multiple choice.
    // A lone option line is not a choice set — fold it back into the
    // question text so GENERAL questions keep an empty options list.
    let kind = if options.len() >= 2 {
        QuestionType::MultipleChoice
    } else {
        if let Some(lone) = options.pop() {
            text_parts.push(lone);
        }
        QuestionType::General
    };

    let text = text_parts.join(" ").trim().to_string();
    if text.is_empty() {
        return None;
    }

    let options = if kind == QuestionType::MultipleChoice {
        options
            .into_iter()
            .map(|o| truncate_chars(&o, MAX_TEXT_LEN))
            .collect()
    } else {
        Vec::new()
    };

    Some(Question {
        text: truncate_chars(&text, MAX_TEXT_LEN),
        kind,
        options,
        answer: truncate_chars(answer_parts.join("\n").trim(), MAX_ANSWER_LEN),
        explanation: truncate_chars(explanation_parts.join(" ").trim(), MAX_EXPLANATION_LEN),
    })
}

// ── Tests ────────────────────────────────────────────────────────────────
