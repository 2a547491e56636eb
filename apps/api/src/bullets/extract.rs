//! Pulls the JSON object out of the model's free-text reply.

/// Greedy match from the first `{` to the last `}`.
///
/// Whatever lies between is returned as-is, so prose that contains braces
/// after the object will be captured too.
pub fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_surrounded_by_prose() {
        let text = "Here are your statements:\n{\"other\": []}\nLet me know!";
        assert_eq!(find_json_object(text), Some("{\"other\": []}"));
    }

    #[test]
    fn test_nested_objects_are_kept_whole() {
        let text = r#"{"leadership":[{"bullet":"Led team.","chars":9}]}"#;
        assert_eq!(find_json_object(text), Some(text));
    }

    #[test]
    fn test_no_braces() {
        assert_eq!(find_json_object("I cannot help with that."), None);
    }

    #[test]
    fn test_only_opening_brace() {
        assert_eq!(find_json_object("oops { truncated"), None);
    }

    #[test]
    fn test_closing_before_opening() {
        assert_eq!(find_json_object("} then {"), None);
    }

    #[test]
    fn test_greedy_spans_trailing_braces() {
        let text = "{\"a\": 1} and also {b}";
        assert_eq!(find_json_object(text), Some("{\"a\": 1} and also {b}"));
    }
}
