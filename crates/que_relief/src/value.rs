//! Runtime values.
//!
//! Values follow the loose scripting semantics template authors expect:
//! template-literal stringification, truthiness, strict and loose equality,
//! and relational comparison with numeric coercion.

use std::cmp::Ordering;
use std::fmt;

use que_carton::CompactString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field value or an evaluation result
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Missing field or missing result
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(CompactString),
    /// Arrays and objects, kept as JSON
    Other(serde_json::Value),
}

impl Value {
    /// Name of the variant, as used in diagnostics
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Other(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub const fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// `undefined`, `null`, `false`, `0`, `NaN` and `""` are falsy
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Other(_) => true,
        }
    }

    /// Numeric coercion; unparsable text becomes `NaN`
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Undefined => f64::NAN,
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::String(s) => parse_number(s),
            Self::Other(json) => parse_number(&json_to_string(json)),
        }
    }

    /// `===`: same variant and same payload. `NaN` is never equal to itself.
    /// Arrays and objects have no identity here and compare by contents.
    #[inline]
    pub fn strict_eq(&self, other: &Value) -> bool {
        self == other
    }

    /// `==`: equality after coercion
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
            (Self::Bool(_), _) => Value::Number(self.to_number()).loose_eq(other),
            (_, Self::Bool(_)) => self.loose_eq(&Value::Number(other.to_number())),
            (Self::Other(a), Self::Other(b)) => a == b,
            (Self::Other(a), _) => Value::String(json_to_string(a).into()).loose_eq(other),
            (_, Self::Other(b)) => self.loose_eq(&Value::String(json_to_string(b).into())),
            (Self::String(a), Self::String(b)) => a == b,
            _ => self.to_number() == other.to_number(),
        }
    }

    /// Ordering used by `<`, `<=`, `>`, `>=`.
    ///
    /// Two strings compare lexicographically; everything else numerically.
    /// Returns `None` when a `NaN` is involved.
    pub fn loose_cmp(&self, other: &Value) -> Option<Ordering> {
        let left = self.to_primitive();
        let right = other.to_primitive();
        match (&left, &right) {
            (Self::String(a), Self::String(b)) => Some(a.as_str().cmp(b.as_str())),
            _ => left.to_number().partial_cmp(&right.to_number()),
        }
    }

    fn to_primitive(&self) -> Value {
        match self {
            Self::Other(json) => Value::String(json_to_string(json).into()),
            _ => self.clone(),
        }
    }

    /// Convert into JSON; `undefined` becomes `null`
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::String(s) => serde_json::Value::String(s.to_string()),
            Self::Other(json) => json.clone(),
        }
    }
}

/// Render a number the way template literals do
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        String::from("NaN")
    } else if n.is_infinite() {
        String::from(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        String::from("0")
    } else {
        let sign = if n < 0.0 { "-" } else { "" };
        format!("{sign}{}", format_magnitude(n.abs()))
    }
}

/// Shortest round-trip digits placed by the scripting exponent rules:
/// plain notation for decimal exponents in `-7..21`, `d.ddde±x` otherwise.
fn format_magnitude(n: f64) -> String {
    let scientific = format!("{n:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let len = digits.len() as i32;
    // Digits before the decimal point
    let point = exponent + 1;

    if len <= point && point <= 21 {
        format!("{digits}{}", "0".repeat((point - len) as usize))
    } else if 0 < point && point <= 21 {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{whole}.{fraction}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat(point.unsigned_abs() as usize))
    } else {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        let dot = if rest.is_empty() { "" } else { "." };
        format!("{first}{dot}{rest}e{exp_sign}{}", exponent.unsigned_abs())
    }
}

fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    match text {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if text
            .bytes()
            .all(|c| c.is_ascii_digit() || matches!(c, b'.' | b'e' | b'E' | b'+' | b'-')) =>
        {
            text.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

fn json_to_string(json: &serde_json::Value) -> String {
    match json {
        serde_json::Value::Null => String::from("null"),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => format_number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::Null => String::new(),
                other => json_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        serde_json::Value::Object(_) => String::from("[object Object]"),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::String(s) => f.write_str(s),
            Self::Other(json) => f.write_str(&json_to_string(json)),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s.into()),
            other => Self::Other(other),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<CompactString> for Value {
    fn from(s: CompactString) -> Self {
        Self::String(s)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(3).to_string(), "3");
        assert_eq!(Value::from(-0.0).to_string(), "0");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::from(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::from(-12.75).to_string(), "-12.75");
        assert_eq!(Value::from(0.1 + 0.2).to_string(), "0.30000000000000004");
        assert_eq!(Value::from("Max").to_string(), "Max");
        assert_eq!(Value::from(json!([1, null, "a"])).to_string(), "1,,a");
        assert_eq!(Value::from(json!({"a": 1})).to_string(), "[object Object]");
    }

    #[test]
    fn test_exponent_notation() {
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(-2.5e-8), "-2.5e-8");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(0.00012), "0.00012");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e300), "1.5e+300");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(123456789.5), "123456789.5");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::from(2).is_truthy());
        assert!(Value::from(json!([])).is_truthy());
    }

    #[test]
    fn test_strict_eq() {
        assert!(Value::from(1).strict_eq(&Value::from(1.0)));
        assert!(!Value::from(1).strict_eq(&Value::from("1")));
        assert!(!Value::from(f64::NAN).strict_eq(&Value::from(f64::NAN)));
        assert!(!Value::Null.strict_eq(&Value::Undefined));
        assert!(Value::from("a").strict_eq(&Value::from("a")));
        // Arrays and objects are plain data, compared by contents
        assert!(Value::from(json!([1, 2])).strict_eq(&Value::from(json!([1, 2]))));
        assert!(!Value::from(json!({"a": 1})).strict_eq(&Value::from(json!({"a": 2}))));
    }

    #[test]
    fn test_loose_eq() {
        assert!(Value::Null.loose_eq(&Value::Undefined));
        assert!(!Value::Null.loose_eq(&Value::from(0)));
        assert!(Value::from(1).loose_eq(&Value::from("1")));
        assert!(Value::from(true).loose_eq(&Value::from(1)));
        assert!(Value::from(false).loose_eq(&Value::from("")));
        assert!(Value::from("").loose_eq(&Value::from(0)));
        assert!(Value::from(json!([5])).loose_eq(&Value::from(5)));
        assert!(!Value::from("a").loose_eq(&Value::from("b")));
    }

    #[test]
    fn test_loose_cmp() {
        assert_eq!(
            Value::from(2).loose_cmp(&Value::from(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::from("2").loose_cmp(&Value::from("10")),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Value::from("2").loose_cmp(&Value::from(10)),
            Some(Ordering::Less)
        );
        assert_eq!(Value::Undefined.loose_cmp(&Value::from(0)), None);
        assert_eq!(
            Value::Null.loose_cmp(&Value::from(0)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Value::from(" 42 ").to_number(), 42.0);
        assert_eq!(Value::from("").to_number(), 0.0);
        assert!(Value::from("abc").to_number().is_nan());
        assert!(Value::from("inf").to_number().is_nan());
        assert_eq!(Value::from("-Infinity").to_number(), f64::NEG_INFINITY);
        assert_eq!(Value::from(true).to_number(), 1.0);
    }

    #[test]
    fn test_json_roundtrip_shape() {
        let value: Value = serde_json::from_str("{\"a\": [1, 2]}").unwrap();
        assert_eq!(value.type_name(), "object");
        assert_eq!(Value::from(3).to_json(), json!(3));
        assert_eq!(Value::from(1.5).to_json(), json!(1.5));
        assert_eq!(Value::Undefined.to_json(), json!(null));
    }
}
