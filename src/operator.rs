use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NotationError;
use crate::sanitize::Sanitize;

/// Comparison applied between a field and its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    Nin,
    All,
    Exists,
    Regex,
}

impl Operator {
    pub const ALL: [Operator; 11] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Lt,
        Operator::Lte,
        Operator::Gt,
        Operator::Gte,
        Operator::In,
        Operator::Nin,
        Operator::All,
        Operator::Exists,
        Operator::Regex,
    ];

    /// Canonical lowercase spelling used in notation and state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::In => "in",
            Operator::Nin => "nin",
            Operator::All => "all",
            Operator::Exists => "exists",
            Operator::Regex => "regex",
        }
    }

    /// The inclusive bounds written by
    /// [`Constraint::set_field_between`](crate::Constraint::set_field_between).
    pub fn is_range(&self) -> bool {
        matches!(self, Operator::Gte | Operator::Lte)
    }

    /// Lenient parse used for user input: strips disallowed characters
    /// under `policy`, lowercases, then matches the vocabulary.
    pub fn normalize(raw: &str, policy: Sanitize) -> Option<Operator> {
        let candidate = policy.operator(raw);
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == candidate)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse: exact spelling, case-insensitive, no character stripping.
impl FromStr for Operator {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| NotationError::UnknownOperator {
                operator: s.to_owned(),
            })
    }
}
