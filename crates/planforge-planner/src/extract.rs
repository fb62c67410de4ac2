//! Pull a JSON object out of free-form model output.
//!
//! Models wrap JSON in prose and code fences, and long replies get cut off at
//! the token limit. [`parse_json_reply`] tries, in order:
//!
//! 1. each top-level balanced `{...}` span (string- and escape-aware);
//! 2. the greedy span from the first `{` to the last `}`;
//! 3. the truncated tail, closed up by [`repair_truncated`].
//!
//! A `{` only counts as an object start when `"` or `}` follows it, so a
//! brace in prose never hides the JSON after it.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON object found in the reply")]
    NoJson,

    #[error("JSON in the reply could not be decoded: {0}")]
    Invalid(String),
}

// ─────────────────────────────────────────────
// Scanner
// ─────────────────────────────────────────────

/// Structural state after scanning a prefix that starts at `{`.
#[derive(Debug, Default)]
struct Scan {
    /// Open containers, innermost last (`b'{'` or `b'['`).
    stack: Vec<u8>,
    in_string: bool,
    /// The last byte was a backslash inside a string.
    escaped: bool,
    /// Offsets where the text can be cut and still close cleanly:
    /// before each `,` and just after each opening bracket.
    cuts: Vec<usize>,
    /// Length of the span once the outermost object closes.
    closed_at: Option<usize>,
}

// Only ASCII bytes are inspected, so every recorded offset is a char boundary.
fn scan(s: &str) -> Scan {
    let mut st = Scan::default();
    for (i, b) in s.bytes().enumerate() {
        if st.in_string {
            if st.escaped {
                st.escaped = false;
            } else if b == b'\\' {
                st.escaped = true;
            } else if b == b'"' {
                st.in_string = false;
            }
            continue;
        }
        match b {
            b'"' => st.in_string = true,
            b'{' | b'[' => {
                st.stack.push(b);
                st.cuts.push(i + 1);
            }
            b'}' | b']' => {
                st.stack.pop();
                if st.stack.is_empty() {
                    st.closed_at = Some(i + 1);
                    break;
                }
            }
            b',' => st.cuts.push(i),
            _ => {}
        }
    }
    st
}

/// Offsets of every `{` that can open a JSON object: the next non-whitespace
/// character is `"` or `}`. Prose braces such as `{ notation` are skipped.
fn object_starts(text: &str) -> impl Iterator<Item = usize> + '_ {
    text.match_indices('{').filter_map(move |(i, _)| {
        match text[i + 1..].trim_start().chars().next() {
            Some('"') | Some('}') => Some(i),
            _ => None,
        }
    })
}

fn first_object_start(text: &str) -> Option<usize> {
    object_starts(text).next()
}

/// Top-level balanced `{...}` spans, left to right.
///
/// Scanning stops at the first object start that never closes: everything
/// after it is inside that object.
fn balanced_candidates(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for start in object_starts(text) {
        if start < offset {
            continue;
        }
        match scan(&text[start..]).closed_at {
            Some(len) => {
                spans.push(&text[start..start + len]);
                offset = start + len;
            }
            None => break,
        }
    }
    spans
}

fn greedy_span(text: &str) -> Option<&str> {
    let start = first_object_start(text)?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

// ─────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────

/// The first top-level balanced object in `text` that is valid JSON.
pub fn extract_json_object(text: &str) -> Option<&str> {
    balanced_candidates(text)
        .into_iter()
        .find(|candidate| serde_json::from_str::<Value>(candidate).is_ok())
}

/// Close up a reply that was cut off mid-object.
///
/// Starts at the first `{` that can open an object. Closes an open string, drops a dangling `,` or
/// `key:`, and appends a closer for every open `[` and `{`. When that is not
/// valid JSON, cuts back to earlier element boundaries until it is. Returns
/// `None` when the object was never truncated or nothing useful survives.
pub fn repair_truncated(text: &str) -> Option<String> {
    let start = first_object_start(text)?;
    let tail = &text[start..];
    let state = scan(tail);
    if state.closed_at.is_some() {
        return None;
    }

    std::iter::once(tail.len())
        .chain(state.cuts.iter().rev().copied().filter(|&cut| cut > 1))
        .find_map(|end| close_at(tail, end))
}

/// Decode the JSON object in a model reply into `T`.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    if !text.contains('{') {
        return Err(ExtractError::NoJson);
    }

    let mut last_error = None;
    let mut attempt = |candidate: &str| match serde_json::from_str::<T>(candidate) {
        Ok(value) => Some(value),
        Err(e) => {
            last_error = Some(e.to_string());
            None
        }
    };

    for candidate in balanced_candidates(text) {
        if let Some(value) = attempt(candidate) {
            return Ok(value);
        }
    }
    if let Some(value) = greedy_span(text).and_then(&mut attempt) {
        return Ok(value);
    }
    if let Some(value) = repair_truncated(text).and_then(|fixed| attempt(&fixed)) {
        return Ok(value);
    }

    Err(ExtractError::Invalid(
        last_error.unwrap_or_else(|| "no complete object".to_string()),
    ))
}

// ─────────────────────────────────────────────
// Repair helpers
// ─────────────────────────────────────────────

fn close_at(tail: &str, end: usize) -> Option<String> {
    let mut out = tail[..end].trim_end().to_string();

    let state = scan(&out);
    if state.in_string {
        if state.escaped {
            out.pop();
        }
        out.push('"');
    }
    drop_dangling(&mut out);

    let state = scan(&out);
    for open in state.stack.iter().rev() {
        out.push(if *open == b'{' { '}' } else { ']' });
    }

    let value: Value = serde_json::from_str(&out).ok()?;
    value
        .as_object()
        .is_some_and(|obj| !obj.is_empty())
        .then_some(out)
}

/// Strip a trailing `,` or `"key":` that has no value after it.
fn drop_dangling(out: &mut String) {
    loop {
        let len = out.trim_end().len();
        out.truncate(len);

        if out.ends_with(',') {
            out.pop();
        } else if out.ends_with(':') {
            out.pop();
            let len = out.trim_end().len();
            out.truncate(len);
            if out.ends_with('"') {
                if let Some(open) = out[..out.len() - 1].rfind('"') {
                    out.truncate(open);
                }
            }
        } else {
            break;
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
