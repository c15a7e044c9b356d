use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::triplet::CRITERION_SEPARATOR;

pub type Result<T, E = NotationError> = std::result::Result<T, E>;

/// Failures raised to the caller.
///
/// Malformed criteria are not errors: they are dropped or nulled while
/// parsing. Only calls that can never describe a criterion end up here.
#[derive(Debug, Diagnostic, Error)]
pub enum NotationError {
    #[error("Invalid notation (\"{src}\"), a triplet cannot contain a comma")]
    #[diagnostic(
        code(triplet::comma_in_triplet),
        help("Split the notation on ',' first, or parse it as a constraint")
    )]
    CommaInTriplet {
        #[source_code]
        src: String,
        #[label("criterion separator")]
        span: SourceSpan,
    },

    #[error("Range bound for field '{field}' must be a finite number, found: {value}")]
    #[diagnostic(code(triplet::non_numeric_bound))]
    NonNumericBound { field: String, value: String },

    #[error("Unknown operator: {operator}")]
    #[diagnostic(
        code(triplet::unknown_operator),
        help("Valid operators: eq, ne, lt, lte, gt, gte, in, nin, all, exists, regex")
    )]
    UnknownOperator { operator: String },

    #[error("Invalid constraint state: {0}")]
    #[diagnostic(code(triplet::json))]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    #[diagnostic(code(triplet::io_error))]
    Io(#[from] std::io::Error),
}

impl NotationError {
    /// Builds the comma failure, labelling the first comma of `notation`.
    pub(crate) fn comma_in_triplet(notation: &str) -> Self {
        let offset = notation.find(CRITERION_SEPARATOR).unwrap_or_default();
        NotationError::CommaInTriplet {
            src: notation.to_owned(),
            span: (offset, CRITERION_SEPARATOR.len()).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_span_points_at_first_comma() {
        match NotationError::comma_in_triplet("Foo_$eq_$Bar,Baz") {
            NotationError::CommaInTriplet { span, src } => {
                assert_eq!(span.offset(), 12);
                assert_eq!(span.len(), 1);
                assert_eq!(src, "Foo_$eq_$Bar,Baz");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
