use crate::schemas::grading::GradingResult;

use super::GradingError;

/// Finds the first top-level JSON object in a model reply. Code fences and
/// surrounding prose are skipped, including a stray `{` that is never
/// closed; braces inside string literals do not count towards nesting.
pub(crate) fn extract_json_object(text: &str) -> Result<&str, GradingError> {
    let bytes = text.as_bytes();
    let mut cursor = 0;
    let mut first_error: Option<String> = None;
    let mut saw_open = false;

    while let Some(offset) = text[cursor..].find('{') {
        let start = cursor + offset;
        saw_open = true;

        let Some(end) = matching_brace(bytes, start) else {
            cursor = start + 1;
            continue;
        };

        let candidate = &text[start..=end];
        match serde_json::from_str::<serde_json::Value>(candidate) {
            Ok(value) if value.is_object() => return Ok(candidate),
            Ok(_) => {}
            Err(err) => {
                first_error.get_or_insert_with(|| err.to_string());
            }
        }
        cursor = end + 1;
    }

    match first_error {
        Some(message) => Err(GradingError::Parse(message)),
        None if saw_open => Err(GradingError::Parse("unterminated JSON object".to_string())),
        None => Err(GradingError::NoJson),
    }
}

pub(crate) fn parse_grading_reply(text: &str) -> Result<GradingResult, GradingError> {
    let object = extract_json_object(text)?;
    serde_json::from_str(object).map_err(|err| GradingError::Schema(err.to_string()))
}

fn matching_brace(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, byte) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if *byte == b'\\' {
                escaped = true;
            } else if *byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }

    None
}
