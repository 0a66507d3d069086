//! Run-time argument checks for values handed over by a dynamically typed caller.

use serde_json::Value;

pub fn is_one_of(value: &str, candidates: &[&str]) -> bool {
    candidates.contains(&value)
}

/// True for 1 to `max_len` ASCII letters, digits or underscores.
pub fn is_alpha_numeric_underscore(value: &str, max_len: usize) -> bool {
    !value.is_empty()
        && value.len() <= max_len
        && value
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
}

/// Short description of a value's type for diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn alpha_numeric_underscore_bounds() {
        assert!(is_alpha_numeric_underscore("a", 32));
        assert!(is_alpha_numeric_underscore("Level_Up_2", 32));
        assert!(is_alpha_numeric_underscore(&"x".repeat(32), 32));
        assert!(!is_alpha_numeric_underscore(&"x".repeat(33), 32));
        assert!(!is_alpha_numeric_underscore("", 32));
        assert!(!is_alpha_numeric_underscore("has space", 32));
        assert!(!is_alpha_numeric_underscore("dash-ed", 32));
        assert!(!is_alpha_numeric_underscore("caf\u{e9}", 32));
    }

    #[test]
    fn one_of_is_exact_and_case_sensitive() {
        let names = ["error", "first_open"];
        assert!(is_one_of("error", &names));
        assert!(!is_one_of("Error", &names));
        assert!(!is_one_of("error ", &names));
    }

    #[test]
    fn type_names() {
        assert_eq!(type_name(&json!(42)), "number");
        assert_eq!(type_name(&Value::Null), "null");
        assert_eq!(type_name(&json!([])), "array");
    }
}
