//! Locating JSON in model replies.
//!
//! Structured output mode normally yields bare JSON, but replies still arrive
//! wrapped in markdown fences or prefixed with chatter often enough that the
//! client digs the payload out before parsing.

use serde_json::Value;
use storyloom_error::{AgentProtocolError, AgentProtocolErrorKind};

/// Parse a model reply into a JSON value.
///
/// The whole trimmed reply is tried first. Failing that, each candidate from
/// [`json_candidates`] is parsed in turn and the first one that parses wins,
/// so a bracketed aside in the prose or a fence inside a string literal does
/// not hide the real payload.
///
/// # Errors
///
/// - [`AgentProtocolErrorKind::EmptyResponse`] for a blank reply
/// - [`AgentProtocolErrorKind::NoJson`] when nothing JSON-like is present
/// - [`AgentProtocolErrorKind::InvalidJson`] when every candidate fails to
///   parse, carrying the error from the first candidate
///
/// # Examples
///
/// ```
/// use storyloom_copilot::parse_reply_json;
///
/// let reply = "Sure!\n```json\n{\"displayText\": \"hi\", \"actions\": []}\n```";
/// let value = parse_reply_json(reply).unwrap();
/// assert_eq!(value["displayText"], "hi");
/// ```
pub fn parse_reply_json(reply: &str) -> Result<Value, AgentProtocolError> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(AgentProtocolError::new(AgentProtocolErrorKind::EmptyResponse));
    }

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let candidates = json_candidates(trimmed);
    if candidates.is_empty() {
        tracing::error!(response_length = reply.len(), "No JSON found in model reply");
        return Err(AgentProtocolError::new(AgentProtocolErrorKind::NoJson(reply.len())));
    }

    let mut first_failure = None;
    for candidate in &candidates {
        match serde_json::from_str(candidate) {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::debug!(error = %e, "JSON candidate rejected, trying next");
                first_failure.get_or_insert((*candidate, e));
            }
        }
    }

    let (candidate, e) = match first_failure {
        Some(failure) => failure,
        None => return Err(AgentProtocolError::new(AgentProtocolErrorKind::NoJson(reply.len()))),
    };
    let preview: String = candidate.chars().take(100).collect();
    tracing::error!(
        error = %e,
        json_preview = %preview,
        candidates = candidates.len(),
        "Model reply JSON failed to parse"
    );
    Err(AgentProtocolError::new(AgentProtocolErrorKind::InvalidJson(e.to_string())))
}

/// Find the most plausible JSON text inside `response`.
///
/// Returns the first candidate that parses, or the first candidate at all
/// when none do.
pub fn extract_json(response: &str) -> Option<&str> {
    let candidates = json_candidates(response);
    candidates
        .iter()
        .copied()
        .find(|candidate| serde_json::from_str::<Value>(candidate).is_ok())
        .or_else(|| candidates.first().copied())
}

/// Spans that may hold the payload, most plausible first: a fenced block,
/// then the balanced span opened by whichever of `{` or `[` comes first,
/// then the balanced span of the other delimiter.
fn json_candidates(response: &str) -> Vec<&str> {
    let object = || balanced(response, '{', '}');
    let array = || balanced(response, '[', ']');

    let array_first = match (response.find('{'), response.find('[')) {
        (Some(brace), Some(bracket)) => bracket < brace,
        (None, Some(_)) => true,
        _ => false,
    };
    let spans = if array_first {
        [fenced_block(response), array(), object()]
    } else {
        [fenced_block(response), object(), array()]
    };

    let mut candidates: Vec<&str> = Vec::with_capacity(spans.len());
    for span in spans.into_iter().flatten() {
        if !candidates.contains(&span) {
            candidates.push(span);
        }
    }
    candidates
}

/// Contents of the first fenced code block, preferring one tagged `json`.
///
/// An unterminated fence (truncated reply) runs to the end of the text.
fn fenced_block(response: &str) -> Option<&str> {
    let (body_start, tagged) = match response.find("```json") {
        Some(start) => (start + "```json".len(), true),
        None => (response.find("```")? + 3, false),
    };

    let body_start = if tagged {
        body_start
    } else {
        // Skip a language tag line such as "```javascript".
        let rest = &response[body_start..];
        match rest.find('\n') {
            Some(newline) if rest[..newline].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
                body_start + newline + 1
            }
            _ => body_start,
        }
    };

    let body = &response[body_start..];
    let body = match body.find("```") {
        Some(end) => &body[..end],
        None => body,
    };
    let body = body.trim();
    (!body.is_empty()).then_some(body)
}

/// Text from the first `open` to its matching `close`, skipping delimiters
/// inside string literals.
fn balanced(response: &str, open: char, close: char) -> Option<&str> {
    let start = response.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in response[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&response[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
