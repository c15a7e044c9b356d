use serde::{Deserialize, Serialize};

use crate::sanitize::Sanitize;

/// Settings shared by a constraint and every triplet it builds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotationConfig {
    /// Character stripping policy for fields, operators and operands.
    #[serde(default)]
    pub sanitize: Sanitize,
}

impl NotationConfig {
    pub fn strip_all() -> Self {
        NotationConfig {
            sanitize: Sanitize::All,
        }
    }

    pub fn strip_first() -> Self {
        NotationConfig {
            sanitize: Sanitize::FirstMatch,
        }
    }
}
