//! Splits inbound stream payloads into progress lines and the final result.
//!
//! The pipeline sends free-text status lines and, last, a JSON document with
//! the articles and sentiment counts. A payload is the result exactly when it
//! deserializes into a [`SessionResult`] from a JSON object, with `null`
//! members read as absent; every other payload is a progress line and is
//! kept verbatim. Failing to parse is the
//! normal way to recognise a progress line, so nothing here returns an error.

use serde::Deserialize;
use serde_json::Value;

use crate::SessionResult;

/// Outcome of classifying one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// Human-readable status line, byte-for-byte as received.
    Progress(String),
    /// The terminal structured result.
    Result(SessionResult),
}

/// Classify one raw event payload.
pub fn classify(payload: &str) -> Classified {
    match parse_result(payload) {
        Some(result) => Classified::Result(result),
        None => Classified::Progress(payload.to_string()),
    }
}

fn parse_result(payload: &str) -> Option<SessionResult> {
    let value: Value = serde_json::from_str(payload).ok()?;
    // serde would also accept a JSON array for a struct; only objects count.
    if !value.is_object() {
        return None;
    }
    SessionResult::deserialize(value).ok()
}
