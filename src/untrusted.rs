//! Field decoders for untrusted JSON (storage blobs, UI text fields)
//!
//! Every settings normalizer reads its input through these helpers so that a
//! missing, mistyped or out-of-range field degrades to a fallback instead of
//! failing the whole record.

use serde_json::Value;

/// Look up `key` on an object; anything that is not an object has no fields
pub fn field<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
    raw.as_object().and_then(|obj| obj.get(key))
}

/// Loose numeric coercion.
///
/// - numbers pass through
/// - `null` and blank strings are 0
/// - booleans are 1 / 0
/// - strings are parsed after trimming
/// - missing fields, arrays and objects are not numbers
///
/// Returns `None` when the result would not be finite.
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        Value::Array(_) | Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}

/// Numeric field where 0 also selects the fallback (`Number(x) || fallback`)
pub fn nonzero_number_or(raw: &Value, key: &str, fallback: f64) -> f64 {
    match coerce_number(field(raw, key)) {
        Some(n) if n != 0.0 => n,
        _ => fallback,
    }
}

/// String field, or `None` when the field is missing or not a string
pub fn string<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    field(raw, key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_number_variants() {
        assert_eq!(coerce_number(Some(&json!(12.5))), Some(12.5));
        assert_eq!(coerce_number(Some(&json!(" 42 "))), Some(42.0));
        assert_eq!(coerce_number(Some(&json!(""))), Some(0.0));
        assert_eq!(coerce_number(Some(&json!(null))), Some(0.0));
        assert_eq!(coerce_number(Some(&json!(true))), Some(1.0));
        assert_eq!(coerce_number(Some(&json!("abc"))), None);
        assert_eq!(coerce_number(Some(&json!("inf"))), None);
        assert_eq!(coerce_number(Some(&json!([1]))), None);
        assert_eq!(coerce_number(Some(&json!({}))), None);
        assert_eq!(coerce_number(None), None);
    }

    #[test]
    fn test_field_on_non_object() {
        assert!(field(&json!(null), "x").is_none());
        assert!(field(&json!([1, 2]), "x").is_none());
        assert_eq!(string(&json!("junk"), "x"), None);
    }

    #[test]
    fn test_nonzero_fallback() {
        let raw = json!({ "a": 0, "b": "5", "c": "x" });
        assert_eq!(nonzero_number_or(&raw, "a", 9.0), 9.0);
        assert_eq!(nonzero_number_or(&raw, "b", 9.0), 5.0);
        assert_eq!(nonzero_number_or(&raw, "c", 9.0), 9.0);
        assert_eq!(nonzero_number_or(&raw, "missing", 9.0), 9.0);
    }
}
