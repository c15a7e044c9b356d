//! A single `field OP operands` criterion and its notation.
//!
//! ```
//! use triplet_notation::{Operator, Triplet};
//!
//! let stmt = Triplet::new("UserName", "eq", "alice");
//! assert_eq!(stmt.to_string(), "UserName_$eq_$alice");
//! assert_eq!(stmt.field(), Some("UserName"));
//! assert_eq!(stmt.operator(), Some(Operator::Eq));
//! assert_eq!(stmt.operands(), ["alice"]);
//! ```

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::Serialize;

use crate::config::NotationConfig;
use crate::error::{NotationError, Result};
use crate::operand::RawOperands;
use crate::operator::Operator;

/// Separates field, operator and operands within one criterion.
pub const PART_SEPARATOR: &str = "_$";
/// Separates operands.
pub const OPERAND_SEPARATOR: &str = "|";
/// Separates criteria in a constraint notation.
pub const CRITERION_SEPARATOR: &str = ",";

/// One criterion. Every setter sanitizes its input; parts that do not
/// survive sanitization are stored as `None` (or dropped, for operands).
#[derive(Debug, Clone, Default)]
pub struct Triplet {
    field: Option<String>,
    operator: Option<Operator>,
    operands: Vec<String>,
    config: NotationConfig,
}

/// Plain view of a triplet, as used to move between triplets and a
/// constraint definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripletDefinition {
    pub field: Option<String>,
    pub operator: Option<Operator>,
    pub operands: RawOperands,
}

impl Triplet {
    pub fn new(field: &str, operator: &str, operands: impl Into<RawOperands>) -> Self {
        Self::with_config(field, operator, operands, NotationConfig::default())
    }

    pub fn with_config(
        field: &str,
        operator: &str,
        operands: impl Into<RawOperands>,
        config: NotationConfig,
    ) -> Self {
        let mut triplet = Triplet {
            config,
            ..Triplet::default()
        };
        triplet.set_field(field);
        triplet.set_operator(operator);
        triplet.set_operands(operands);
        triplet
    }

    /// Triplet for a field name that has been sanitized already, such as a
    /// constraint key. Only the operands are sanitized.
    pub(crate) fn with_key(
        key: &str,
        operator: Operator,
        operands: impl Into<RawOperands>,
        config: NotationConfig,
    ) -> Self {
        let mut triplet = Triplet {
            field: Some(key.to_owned()),
            operator: Some(operator),
            operands: Vec::new(),
            config,
        };
        triplet.set_operands(operands);
        triplet
    }

    /// Parses exactly one criterion.
    ///
    /// A fragment with a comma is an error. A fragment without exactly two
    /// part separators is not, and yields an empty, invalid triplet.
    pub fn from_notation(notation: &str) -> Result<Self> {
        Self::from_notation_with(notation, NotationConfig::default())
    }

    pub fn from_notation_with(notation: &str, config: NotationConfig) -> Result<Self> {
        if notation.contains(CRITERION_SEPARATOR) {
            return Err(NotationError::comma_in_triplet(notation));
        }
        if notation.matches(PART_SEPARATOR).count() != 2 {
            log::debug!("ignoring criterion without two part separators: {notation:?}");
            return Ok(Triplet {
                config,
                ..Triplet::default()
            });
        }
        let mut parts = notation.split(PART_SEPARATOR);
        let field = parts.next().unwrap_or_default();
        let operator = parts.next().unwrap_or_default();
        let operands = parts.next().unwrap_or_default();
        Ok(Self::with_config(field, operator, operands, config))
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn operands(&self) -> &[String] {
        &self.operands
    }

    pub fn config(&self) -> NotationConfig {
        self.config
    }

    /// Field name, e.g. `UserName` in `UserName_$eq_$root`.
    pub fn set_field<'a>(&mut self, field: impl Into<Option<&'a str>>) {
        let sanitize = self.config.sanitize;
        self.field = field.into().map(|f| sanitize.field(f).into_owned());
    }

    /// Comparison, e.g. `eq` in `UserName_$eq_$root`. Unknown operators are
    /// stored as `None`.
    pub fn set_operator<'a>(&mut self, operator: impl Into<Option<&'a str>>) {
        let sanitize = self.config.sanitize;
        self.operator = operator
            .into()
            .and_then(|op| Operator::normalize(op, sanitize));
        if self.operator.is_none() {
            log::debug!("operator rejected for field {:?}", self.field);
        }
    }

    /// Values to compare against, pipe separated or as a list. Tokens that
    /// are empty after trimming, or that contain whitespace, are dropped.
    pub fn set_operands(&mut self, operands: impl Into<RawOperands>) {
        let sanitize = self.config.sanitize;
        self.operands = operands
            .into()
            .tokens()
            .into_iter()
            .filter_map(|token| sanitize.operand(token))
            .collect();
    }

    /// A field, an operator and at least one operand.
    pub fn is_valid(&self) -> bool {
        self.field.is_some() && self.operator.is_some() && !self.operands.is_empty()
    }

    /// Operands joined as a string, or kept as a list.
    pub fn to_definition(&self, stringify_operands: bool) -> TripletDefinition {
        let operands = if stringify_operands {
            RawOperands::Joined(self.operands.iter().join(OPERAND_SEPARATOR))
        } else {
            RawOperands::List(self.operands.clone())
        };
        TripletDefinition {
            field: self.field.clone(),
            operator: self.operator,
            operands,
        }
    }
}

/// Canonical notation; empty for an invalid triplet.
impl fmt::Display for Triplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.field, self.operator) {
            (Some(field), Some(operator)) if !self.operands.is_empty() => write!(
                f,
                "{field}{sep}{operator}{sep}{operands}",
                sep = PART_SEPARATOR,
                operands = self.operands.iter().join(OPERAND_SEPARATOR),
            ),
            _ => Ok(()),
        }
    }
}

impl FromStr for Triplet {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self> {
        Triplet::from_notation(s)
    }
}

impl PartialEq for Triplet {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.operator == other.operator
            && self.operands == other.operands
    }
}

impl Eq for Triplet {}
