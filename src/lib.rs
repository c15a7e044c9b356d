//! Codec between filter criteria and triplet notation.
//!
//! A criterion is a [`Triplet`]: a field, a comparison [`Operator`] and a
//! list of operands, written `field_$operator_$operand|operand`. A
//! [`Constraint`] holds many criteria, at most one operand list per
//! (field, operator) pair, and is written as comma separated triplets.
//!
//! ```
//! use triplet_notation::{Constraint, Operand, Operator};
//!
//! let mut q: Constraint = "Foo_$in_$Bar|Baz,Buz_$eq_$".parse().unwrap();
//! assert_eq!(q.to_string(), "Foo_$in_$Bar|Baz");
//! assert!(q.get_field("Buz")[&Operator::Eq].is_empty());
//!
//! q.set_field("Foo", "eq", "Quux", true);
//! assert_eq!(q.to_string(), "Foo_$eq_$Quux");
//! assert_eq!(q.get_field("Foo")[&Operator::Eq], vec![Operand::from("Quux")]);
//! ```
//!
//! Malformed input is dropped rather than reported. Only a comma inside a
//! single triplet and a non-numeric range bound are errors.

pub mod config;
pub mod constraint;
pub mod epoch;
pub mod error;
pub mod operand;
pub mod operator;
pub mod sanitize;
pub mod triplet;

#[cfg(test)]
mod proptest_generators;

pub use config::NotationConfig;
pub use constraint::{Constraint, ConstraintState, Definition, FieldDefinition, StateDefinition};
pub use error::{NotationError, Result};
pub use operand::{Operand, RawOperands};
pub use operator::Operator;
pub use sanitize::Sanitize;
pub use triplet::{Triplet, TripletDefinition, CRITERION_SEPARATOR, OPERAND_SEPARATOR, PART_SEPARATOR};
