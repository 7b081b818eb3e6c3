//! Structural equality over JSON values.
//!
//! Style documents are compared the way a renderer would see them: key order
//! is irrelevant and numbers compare by value, so `1` and `1.0` are the same
//! zoom level. An absent key is only equal to another absent key.

use serde_json::{Number, Value};

/// Returns `true` if `a` and `b` are structurally equal.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| deep_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, a)| y.get(key).is_some_and(|b| deep_equal(a, b)))
        }
        _ => a == b,
    }
}

/// Equality over optional values, where `None` stands for an absent key.
pub fn equal_opt(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => deep_equal(a, b),
        _ => false,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_and_float_forms_are_equal() {
        assert!(deep_equal(&json!(1), &json!(1.0)));
        assert!(deep_equal(&json!([0, 22]), &json!([0.0, 22.0])));
        assert!(!deep_equal(&json!(1), &json!(1.5)));
    }

    #[test]
    fn key_order_is_ignored() {
        let a: Value = serde_json::from_str(r#"{"a": 1, "b": {"c": [1, 2]}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"b": {"c": [1, 2]}, "a": 1}"#).unwrap();
        assert!(deep_equal(&a, &b));
    }

    #[test]
    fn array_order_matters() {
        assert!(!deep_equal(&json!([1, 2]), &json!([2, 1])));
    }

    #[test]
    fn extra_keys_differ() {
        assert!(!deep_equal(&json!({"a": 1}), &json!({"a": 1, "b": null})));
    }

    #[test]
    fn absent_is_not_null() {
        assert!(equal_opt(None, None));
        assert!(!equal_opt(None, Some(&Value::Null)));
        assert!(equal_opt(Some(&json!("x")), Some(&json!("x"))));
    }

    #[test]
    fn mixed_types_differ() {
        assert!(!deep_equal(&json!("1"), &json!(1)));
        assert!(!deep_equal(&json!({}), &json!([])));
    }
}
