//! Helpers for cleaning up model output.

/// Extract the JSON payload from a model reply: the first fenced block if
/// there is one, otherwise the outermost `{...}` span.
pub fn extract_json_from_response(response_text: &str) -> String {
    let trimmed = response_text.trim();

    if let Some(inner) = fenced_block(trimmed) {
        return inner.to_string();
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start <= end {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}

/// Remove surrounding markdown code fences (with or without a language tag)
/// and whitespace.
pub fn strip_code_fences(response_text: &str) -> String {
    let trimmed = response_text.trim();
    fenced_block(trimmed).unwrap_or(trimmed).trim().to_string()
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    let content_start = after_fence.find('\n').map(|nl| nl + 1).unwrap_or(0);
    let content = &after_fence[content_start..];
    let end = content.find("```")?;
    Some(content[..end].trim())
}
