//! Character filters applied to each part of a triplet.
//!
//! Every part of a criterion is cleaned the same way whether it was built
//! programmatically or parsed from notation: disallowed characters are
//! removed, then the caller decides whether what is left is usable.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static FIELD_DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[^a-z0-9\s]").expect("static regex"));

static OPERATOR_DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[^a-z0-9]").expect("static regex"));

static OPERAND_DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[^a-z0-9_\-\s]").expect("static regex"));

static OPERAND_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[0-9a-z_-]*$").expect("static regex"));

/// How many disallowed characters a sanitizer removes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sanitize {
    /// Remove every disallowed character. Applying it twice changes nothing,
    /// so notation re-parsed from its own output is stable.
    #[default]
    All,
    /// Remove only the first disallowed character: `"Some.Field.Name"`
    /// becomes `"SomeField.Name"` and `"__ne"` stays an invalid operator.
    /// Not idempotent, a field with several disallowed characters loses
    /// one more each time it is re-sanitized.
    FirstMatch,
}

impl Sanitize {
    fn strip<'a>(self, re: &Regex, value: &'a str) -> Cow<'a, str> {
        match self {
            Sanitize::FirstMatch => re.replace(value, ""),
            Sanitize::All => re.replace_all(value, ""),
        }
    }

    /// Field names keep letters, digits and whitespace.
    pub fn field<'a>(self, value: &'a str) -> Cow<'a, str> {
        self.strip(&FIELD_DISALLOWED, value)
    }

    /// Operators keep letters and digits, and are lowercased.
    pub fn operator(self, value: &str) -> String {
        self.strip(&OPERATOR_DISALLOWED, value).to_lowercase()
    }

    /// Cleans one operand token. Returns `None` when nothing usable is left:
    /// an empty token, or one with whitespace inside it.
    pub fn operand(self, value: &str) -> Option<String> {
        let stripped = self.strip(&OPERAND_DISALLOWED, value);
        let trimmed = stripped.trim();
        if trimmed.is_empty() || !OPERAND_TOKEN.is_match(trimmed) {
            return None;
        }
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_removes_one_character() {
        assert_eq!(Sanitize::FirstMatch.field("Some.Field.Name"), "SomeField.Name");
        assert_eq!(Sanitize::FirstMatch.field("Some Field"), "Some Field");
        assert_eq!(Sanitize::FirstMatch.operator("__NE"), "_ne");
    }

    #[test]
    fn all_removes_every_character() {
        assert_eq!(Sanitize::All.field("Some.Field.Name"), "SomeFieldName");
        assert_eq!(Sanitize::All.operator("__NE"), "ne");
        assert_eq!(Sanitize::All.operand("a@b@c").as_deref(), Some("abc"));
    }

    #[test]
    fn operand_rejects_blank_and_inner_whitespace() {
        let s = Sanitize::FirstMatch;
        assert_eq!(s.operand("  admin ").as_deref(), Some("admin"));
        assert_eq!(s.operand("REQ_SECURITY-SCAN").as_deref(), Some("REQ_SECURITY-SCAN"));
        assert_eq!(s.operand("   "), None);
        assert_eq!(s.operand(""), None);
        assert_eq!(s.operand("Dashed-Operand String"), None);
    }

    #[test]
    fn all_is_idempotent() {
        let once = Sanitize::All.field("A.B.C@D");
        assert_eq!(Sanitize::All.field(&once), once);
    }

    #[test]
    fn operand_first_match_keeps_later_disallowed_characters_out() {
        // '@' is stripped, the remaining '.' then fails the token check
        assert_eq!(Sanitize::FirstMatch.operand("root@example.org"), None);
        assert_eq!(Sanitize::All.operand("root@example.org").as_deref(), Some("rootexampleorg"));
    }
}
