use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::triplet::OPERAND_SEPARATOR;

/// One stored comparison value.
///
/// Operands are text, except range bounds set through
/// [`Constraint::set_field_between`](crate::Constraint::set_field_between),
/// which keep their numeric value in the definition and in exported state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    Number(Number),
    Text(String),
}

impl Operand {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Operand::Text(s) => Some(s),
            Operand::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Operand::Number(n) => Some(n),
            Operand::Text(_) => None,
        }
    }

    /// Numeric value, also for text operands that spell a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Number(n) => n.as_f64(),
            Operand::Text(s) => s.parse().ok(),
        }
    }

    /// Wraps a finite float, storing integral values as integers so they
    /// render without a fractional part.
    pub fn from_f64(value: f64) -> Option<Operand> {
        if !value.is_finite() {
            return None;
        }
        if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            return Some(Operand::Number(Number::from(value as i64)));
        }
        Number::from_f64(value).map(Operand::Number)
    }
}

/// Strings and numbers as such. Other scalars become text, `null` an empty
/// one, so operand sanitization decides whether they survive.
impl<'de> Deserialize<'de> for Operand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(Operand::Number(n)),
            Value::String(s) => Ok(Operand::Text(s)),
            Value::Bool(b) => Ok(Operand::Text(b.to_string())),
            Value::Null => Ok(Operand::Text(String::new())),
            other => Err(serde::de::Error::custom(format!(
                "operand must be a string or a number, found {other}"
            ))),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(n) => write!(f, "{}", n),
            Operand::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::Text(s.to_owned())
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::Text(s)
    }
}

impl From<i64> for Operand {
    fn from(n: i64) -> Self {
        Operand::Number(n.into())
    }
}

/// Operands as supplied by a caller, before sanitization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawOperands {
    /// Pipe separated, e.g. `"Bar|Baz"`.
    Joined(String),
    List(Vec<String>),
}

impl RawOperands {
    /// Candidate tokens, in order.
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            RawOperands::Joined(s) => s.split(OPERAND_SEPARATOR).collect(),
            RawOperands::List(items) => items.iter().map(String::as_str).collect(),
        }
    }

    /// Pipe separated form.
    pub fn joined(&self) -> String {
        match self {
            RawOperands::Joined(s) => s.clone(),
            RawOperands::List(items) => items.iter().join(OPERAND_SEPARATOR),
        }
    }
}

impl Default for RawOperands {
    fn default() -> Self {
        RawOperands::Joined(String::new())
    }
}

impl From<&str> for RawOperands {
    fn from(s: &str) -> Self {
        RawOperands::Joined(s.to_owned())
    }
}

impl From<String> for RawOperands {
    fn from(s: String) -> Self {
        RawOperands::Joined(s)
    }
}

impl From<Vec<String>> for RawOperands {
    fn from(items: Vec<String>) -> Self {
        RawOperands::List(items)
    }
}

impl From<Vec<&str>> for RawOperands {
    fn from(items: Vec<&str>) -> Self {
        RawOperands::List(items.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for RawOperands {
    fn from(items: &[&str]) -> Self {
        RawOperands::List(items.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RawOperands {
    fn from(items: [&str; N]) -> Self {
        RawOperands::List(items.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl From<&[Operand]> for RawOperands {
    fn from(items: &[Operand]) -> Self {
        RawOperands::List(items.iter().map(Operand::to_string).collect())
    }
}

// A single number is one operand.
macro_rules! raw_operands_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RawOperands {
                fn from(n: $t) -> Self {
                    RawOperands::List(vec![n.to_string()])
                }
            }
        )*
    };
}

raw_operands_from_number!(i32, i64, u32, u64, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_become_integers() {
        assert_eq!(Operand::from_f64(1529812800.0).unwrap().to_string(), "1529812800");
        assert_eq!(Operand::from_f64(-3.0), Some(Operand::from(-3)));
        assert_eq!(Operand::from_f64(1.5).unwrap().to_string(), "1.5");
        assert_eq!(Operand::from_f64(f64::NAN), None);
        assert_eq!(Operand::from_f64(f64::INFINITY), None);
        // 2^63 does not fit an i64
        let huge = Operand::from_f64(9_223_372_036_854_775_808.0).unwrap();
        assert!(huge.as_number().unwrap().as_i64().is_none());
        assert_eq!(huge.as_f64(), Some(9_223_372_036_854_775_808.0));
    }

    #[test]
    fn untagged_json_keeps_numbers_and_strings_apart() {
        let parsed: Vec<Operand> = serde_json::from_str(r#"[1529812800, "1529812800"]"#).unwrap();
        assert_eq!(parsed[0], Operand::from(1529812800));
        assert_eq!(parsed[1], Operand::from("1529812800"));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), r#"[1529812800,"1529812800"]"#);
    }

    #[test]
    fn other_scalars_become_text() {
        let parsed: Vec<Operand> = serde_json::from_str("[true, false, null]").unwrap();
        assert_eq!(parsed[0].as_text(), Some("true"));
        assert_eq!(parsed[1].as_text(), Some("false"));
        assert_eq!(parsed[2].as_text(), Some(""));
        assert!(serde_json::from_str::<Vec<Operand>>("[[1]]").is_err());
        assert!(serde_json::from_str::<Vec<Operand>>(r#"[{"a": 1}]"#).is_err());
    }

    #[test]
    fn numbers_are_a_single_operand() {
        assert_eq!(RawOperands::from(123), RawOperands::List(vec!["123".to_owned()]));
        assert_eq!(RawOperands::from("a|b").tokens(), vec!["a", "b"]);
        assert_eq!(RawOperands::from(["a", "b"]).joined(), "a|b");
    }
}
