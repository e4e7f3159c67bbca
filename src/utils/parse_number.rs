use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a numeric-looking string into an `f64`.
/// Blank, malformed or non-finite input (`"NaN"`, `"inf"`) yields `None`.
pub fn parse_number(value: &str) -> Option<f64> {
    let t = value.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerce a loosely typed JSON value into an `f64`.
pub fn value_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Deserialize a number that may arrive as a JSON string. Missing, null or
/// non-numeric values become `NaN` so that validation can reject them later.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(value_to_number).unwrap_or(f64::NAN))
}

/// Like [`lenient_number`] but defaults to zero, for catalog money fields.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(value_to_number).unwrap_or(0.0))
}

/// Identifiers show up as numbers or strings depending on the endpoint.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_numeric_strings() {
        assert_eq!(parse_number(" 8 "), Some(8.0));
        assert_eq!(parse_number("2.5"), Some(2.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("eight"), None);
    }

    #[test]
    fn rejects_non_finite_strings() {
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("-infinity"), None);
        assert_eq!(value_to_number(&json!("NaN")), None);
    }

    #[test]
    fn coerces_json_values() {
        assert_eq!(value_to_number(&json!(4)), Some(4.0));
        assert_eq!(value_to_number(&json!("16")), Some(16.0));
        assert_eq!(value_to_number(&json!(true)), None);
        assert_eq!(value_to_number(&Value::Null), None);
    }
}
