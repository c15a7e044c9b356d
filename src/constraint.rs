//! A collection of triplets with at most one operand list per
//! (field, operator) pair.
//!
//! ```
//! use triplet_notation::Constraint;
//!
//! let mut q = Constraint::new();
//! q.set_field_between("createdAt", 1529812800.0, 1530417600.0)?;
//! q.set_field("Owner", "eq", "Administrator", false);
//! assert_eq!(
//!     q.to_string(),
//!     "createdAt_$gte_$1529812800,createdAt_$lte_$1530417600,Owner_$eq_$Administrator"
//! );
//!
//! // a day later, and without Owner
//! q.set_field_between("createdAt", 1529812800.0, 1530504000.0)?;
//! q.clear_field("Owner");
//! assert_eq!(q.to_string(), "createdAt_$gte_$1529812800,createdAt_$lte_$1530504000");
//! # Ok::<(), triplet_notation::NotationError>(())
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::NotationConfig;
use crate::epoch;
use crate::error::{NotationError, Result};
use crate::operand::{Operand, RawOperands};
use crate::operator::Operator;
use crate::triplet::{Triplet, TripletDefinition, CRITERION_SEPARATOR, PART_SEPARATOR};

/// Operands per operator, for one field.
pub type FieldDefinition = IndexMap<Operator, Vec<Operand>>;

/// Operators per field. Both levels keep insertion order.
pub type Definition = IndexMap<String, FieldDefinition>;

/// Definition as exchanged with the outside world. Operators are plain
/// strings here, so foreign input deserializes and is validated on import.
pub type StateDefinition = IndexMap<String, IndexMap<String, Vec<Operand>>>;

/// Structured form of a constraint:
/// `{ "definition": { field: { operator: [string | number] } } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintState {
    #[serde(default)]
    pub definition: StateDefinition,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Constraint {
    definition: Definition,
    config: NotationConfig,
}

impl Constraint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NotationConfig) -> Self {
        Constraint {
            definition: Definition::new(),
            config,
        }
    }

    pub fn config(&self) -> NotationConfig {
        self.config
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    /// Known field names, in insertion order.
    pub fn field_keys(&self) -> Vec<&str> {
        self.definition.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.definition.is_empty()
    }

    fn key(&self, field: &str) -> String {
        self.config.sanitize.field(field).into_owned()
    }

    /// Copy of the operator map for `field`, empty when the field is unknown.
    pub fn get_field(&self, field: &str) -> FieldDefinition {
        self.definition
            .get(&self.key(field))
            .cloned()
            .unwrap_or_default()
    }

    /// The field's criteria as fresh triplets, incomplete ones included.
    pub fn get_field_triplets(&self, field: &str) -> Vec<Triplet> {
        let mut single = Constraint::with_config(self.config);
        single.load_field(self.key(field), &export_field(&self.get_field(field)));
        single.to_triplets()
    }

    /// Writes the operands for one (field, operator) pair, replacing any
    /// previous operands for that pair.
    ///
    /// An unknown field, or `clear`, first resets the field's operator map.
    /// An invalid operator leaves it at that.
    pub fn set_field(
        &mut self,
        field: &str,
        operator: &str,
        operands: impl Into<RawOperands>,
        clear: bool,
    ) -> &mut Self {
        let key = self.key(field);
        self.set_field_keyed(key, operator, operands, clear)
    }

    // `key` is stored as given; it has been sanitized already.
    fn set_field_keyed(
        &mut self,
        key: String,
        operator: &str,
        operands: impl Into<RawOperands>,
        clear: bool,
    ) -> &mut Self {
        let candidate = Triplet::with_config(&key, operator, operands, self.config);
        if clear || !self.definition.contains_key(&key) {
            self.definition.insert(key.clone(), FieldDefinition::new());
        }
        let Some(operator) = candidate.operator() else {
            log::debug!("rejected operator {operator:?} for field {key:?}");
            return self;
        };
        let operands = candidate
            .operands()
            .iter()
            .cloned()
            .map(Operand::Text)
            .collect();
        self.definition
            .entry(key)
            .or_default()
            .insert(operator, operands);
        self
    }

    /// Sets `field >= begin` and `field <= end`.
    ///
    /// The bounds are stored as numbers, and stay numbers in
    /// [`get_field`](Self::get_field) and [`to_state`](Self::to_state);
    /// notation renders them as text.
    pub fn set_field_between(&mut self, field: &str, begin: f64, end: f64) -> Result<&mut Self> {
        let bound = |value: f64| {
            Operand::from_f64(value).ok_or_else(|| NotationError::NonNumericBound {
                field: field.to_owned(),
                value: value.to_string(),
            })
        };
        let begin = bound(begin)?;
        let end = bound(end)?;
        let key = self.key(field);

        for (operator, value) in [(Operator::Gte, begin), (Operator::Lte, end)] {
            self.set_field_keyed(key.clone(), operator.as_str(), value.to_string(), false);
            self.definition
                .entry(key.clone())
                .or_default()
                .insert(operator, vec![value]);
        }
        Ok(self)
    }

    /// Range covering the `days` days that end at `now`, in epoch
    /// milliseconds.
    pub fn set_field_days_ago(
        &mut self,
        field: &str,
        days: f64,
        now: DateTime<Utc>,
    ) -> Result<&mut Self> {
        let (begin, end) = epoch::days_ago_range(now.timestamp_millis(), days);
        self.set_field_between(field, begin as f64, end as f64)
    }

    /// Keeps the field known, with no operators.
    pub fn clear_field(&mut self, field: &str) -> &mut Self {
        let key = self.key(field);
        self.definition.insert(key, FieldDefinition::new());
        self
    }

    /// Replays every (field, operator, operands) of `definition` through
    /// [`set_field`](Self::set_field). Operands are sanitized as text, except
    /// that range bounds keep their numeric value when sanitization kept
    /// every operand of their list.
    pub fn set_definition(&mut self, definition: &StateDefinition) -> &mut Self {
        for (field, operators) in definition {
            let key = self.key(field);
            self.load_field(key, operators);
        }
        self
    }

    fn load_field(&mut self, key: String, operators: &IndexMap<String, Vec<Operand>>) {
        for (operator, operands) in operators {
            self.set_field_keyed(key.clone(), operator, operands.as_slice(), false);
            self.restore_numbers(&key, operator, operands);
        }
    }

    fn restore_numbers(&mut self, key: &str, operator: &str, original: &[Operand]) {
        if original.iter().all(|o| o.as_number().is_none()) {
            return;
        }
        let Some(operator) = Operator::normalize(operator, self.config.sanitize) else {
            return;
        };
        if !operator.is_range() {
            return;
        }
        let Some(stored) = self
            .definition
            .get_mut(key)
            .and_then(|operators| operators.get_mut(&operator))
        else {
            return;
        };
        if stored.len() != original.len() {
            log::debug!("numeric operands of {key:?} {operator} reduced by sanitization, kept as text");
            return;
        }
        for (slot, value) in stored.iter_mut().zip(original) {
            if value.as_number().is_some() {
                *slot = value.clone();
            }
        }
    }

    pub fn to_state(&self) -> ConstraintState {
        let definition = self
            .definition
            .iter()
            .map(|(field, operators)| (field.clone(), export_field(operators)))
            .collect();
        ConstraintState { definition }
    }

    pub fn from_state(state: &ConstraintState) -> Self {
        Self::from_state_with(state, NotationConfig::default())
    }

    pub fn from_state_with(state: &ConstraintState, config: NotationConfig) -> Self {
        let mut candidate = Constraint::with_config(config);
        candidate.set_definition(&state.definition);
        candidate
    }

    /// Same content as [`to_state`](Self::to_state), as JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_state())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let state: ConstraintState = serde_json::from_str(json)?;
        Ok(Self::from_state(&state))
    }

    /// One triplet per (field, operator) pair. Operands are re-joined and
    /// re-parsed, so they go through operand sanitization again.
    pub fn to_triplets(&self) -> Vec<Triplet> {
        self.definition
            .iter()
            .flat_map(|(field, operators)| {
                operators.iter().map(move |(operator, operands)| {
                    Triplet::with_key(
                        field,
                        *operator,
                        RawOperands::from(operands.as_slice()).joined(),
                        self.config,
                    )
                })
            })
            .collect()
    }

    /// Splits a notation into criteria, keeping non-empty fragments with
    /// exactly two part separators.
    pub fn extract_triplets(notation: &str) -> Vec<&str> {
        notation
            .split(CRITERION_SEPARATOR)
            .filter(|fragment| !fragment.is_empty())
            .filter(|fragment| {
                let keep = fragment.matches(PART_SEPARATOR).count() == 2;
                if !keep {
                    log::trace!("dropping malformed criterion {fragment:?}");
                }
                keep
            })
            .collect()
    }

    pub fn extract_triplets_definition(notation: &str) -> Vec<TripletDefinition> {
        Self::extract_triplets_definition_with(notation, NotationConfig::default())
    }

    pub fn extract_triplets_definition_with(
        notation: &str,
        config: NotationConfig,
    ) -> Vec<TripletDefinition> {
        Self::extract_triplets(notation)
            .into_iter()
            // fragments never hold a comma at this point
            .filter_map(|fragment| Triplet::from_notation_with(fragment, config).ok())
            .map(|triplet| triplet.to_definition(true))
            .collect()
    }

    pub fn from_notation(notation: &str) -> Self {
        Self::from_notation_with(notation, NotationConfig::default())
    }

    pub fn from_notation_with(notation: &str, config: NotationConfig) -> Self {
        let mut candidate = Constraint::with_config(config);
        for definition in Self::extract_triplets_definition_with(notation, config) {
            // the triplet has sanitized the field already
            candidate.set_field_keyed(
                definition.field.unwrap_or_default(),
                definition.operator.map(|op| op.as_str()).unwrap_or_default(),
                definition.operands,
                false,
            );
        }
        candidate
    }
}

fn export_field(operators: &FieldDefinition) -> IndexMap<String, Vec<Operand>> {
    operators
        .iter()
        .map(|(operator, operands)| (operator.as_str().to_owned(), operands.clone()))
        .collect()
}

/// Only complete criteria, comma separated.
impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let triplets = self.to_triplets();
        let joined = triplets
            .iter()
            .filter(|t| t.is_valid())
            .join(CRITERION_SEPARATOR);
        f.write_str(&joined)
    }
}

impl FromStr for Constraint {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Constraint::from_notation(s))
    }
}

/// A copy rebuilt from exported state, so it shares no data with the
/// original and its operands pass through the same sanitization as an
/// import. Field keys are carried over as they are.
impl Clone for Constraint {
    fn clone(&self) -> Self {
        let mut copy = Constraint::with_config(self.config);
        for (key, operators) in self.to_state().definition {
            // cleared fields stay known
            copy.definition.entry(key.clone()).or_default();
            copy.load_field(key, &operators);
        }
        copy
    }
}

impl Serialize for Constraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_state().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Constraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        ConstraintState::deserialize(deserializer).map(|state| Constraint::from_state(&state))
    }
}
