use serde_json::Value;

/// Finds the first complete top-level JSON object in free-form model output.
///
/// Brace depth is tracked outside string literals only, so braces inside
/// strings and escaped quotes do not confuse the scan. A balanced candidate
/// that fails to parse is skipped and the scan resumes after its opening
/// brace.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let mut from = 0;
    while let Some(offset) = text[from..].find('{') {
        let open = from + offset;
        if let Some(len) = balanced_object_len(&text.as_bytes()[open..]) {
            if let Ok(value @ Value::Object(_)) = serde_json::from_str(&text[open..open + len]) {
                return Some(value);
            }
        }
        from = open + 1;
    }
    None
}

/// Length in bytes of the object starting at `bytes[0] == b'{'`, if it closes.
fn balanced_object_len(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &byte) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
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
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}
