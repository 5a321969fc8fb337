//! Lenient JSON extraction from LLM replies.
//!
//! Models wrap JSON in markdown fences, prepend chatter, or append stray
//! braces. These helpers locate the first balanced object so it can be fed
//! to `serde_json`.

/// Extract a JSON object from an LLM response.
///
/// A fenced block (```json or plain ```) wins over loose text; otherwise
/// the first `{` starts the object. Returns the trimmed input when no
/// object is found.
pub fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();
    if trimmed.starts_with('{') {
        return extract_balanced_json(trimmed);
    }

    if let Some(body) = fenced_body(trimmed) {
        return extract_balanced_json(body);
    }

    match trimmed.find('{') {
        Some(start) => extract_balanced_json(&trimmed[start..]),
        None => trimmed,
    }
}

/// Body of the first complete markdown fence, minus its language tag.
fn fenced_body(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after = &text[open + 3..];

    // Skip a tag line, or an inline `json` tag.
    let body_start = match after.strip_prefix("json") {
        Some(rest) if !rest.starts_with('\n') => open + 3 + 4,
        _ => open + 3 + after.find('\n').map_or(0, |i| i + 1),
    };

    let body = &text[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

/// Cut a string that starts with `{` after its matching `}`.
///
/// Braces inside string literals are ignored. If the braces never balance,
/// the input is returned unchanged.
pub fn extract_balanced_json(s: &str) -> &str {
    if !s.starts_with('{') {
        return s;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in s.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &s[..=i];
                }
            }
            _ => {}
        }
    }

    s
}
