use crate::utils::error::{Result, StudioError};

/// Pulls the outermost JSON object or array out of model output that may
/// carry prose or markdown fences around it.
///
/// Starts at whichever of `{` or `[` appears first and ends at the last
/// matching closer. The slice is not parsed here.
pub fn extract_json(text: &str) -> Result<&str> {
    let text = text.trim();

    let start = match (text.find('{'), text.find('[')) {
        (Some(brace), Some(bracket)) => brace.min(bracket),
        (Some(brace), None) => brace,
        (None, Some(bracket)) => bracket,
        (None, None) => {
            return Err(StudioError::JsonExtractionError {
                message: "No JSON object or array found in the response.".to_string(),
            })
        }
    };

    let closer = if text[start..].starts_with('{') { '}' } else { ']' };
    match text.rfind(closer) {
        Some(end) if end > start => Ok(&text[start..=end]),
        _ => Err(StudioError::JsonExtractionError {
            message: format!("Unterminated JSON in the response: missing '{}'.", closer),
        }),
    }
}

/// [`extract_json`] followed by parsing.
pub fn extract_json_value(text: &str) -> Result<serde_json::Value> {
    let slice = extract_json(text)?;
    Ok(serde_json::from_str(slice)?)
}
