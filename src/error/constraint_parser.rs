use std::sync::OnceLock;
use regex::Regex;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// PostgreSQL reports unique violations as a primary message naming the
/// constraint plus a `Key (column)=(value) already exists.` detail line.
pub struct ConstraintParser;

/// Compiled regex patterns for constraint parsing
struct RegexPatterns {
    key_value: Regex,
    relation_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            // Matches "Key (field)=(value)" pattern in PostgreSQL messages
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("valid key/value pattern"),
            // Matches relation or table names in quotes
            relation_name: Regex::new(r#"(?:relation|table) "([^"]+)""#)
                .expect("valid relation pattern"),
        }
    }
}

static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Parses a unique constraint violation into `(entity, field, value)`.
    ///
    /// The constraint name (e.g. `employees_email_key`) gives entity and
    /// field; the value comes from the detail or message text. When no
    /// constraint name is available the `Key (..)=(..)` text is used alone.
    pub fn parse_unique_violation(
        message: &str,
        details: Option<&str>,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = details
            .and_then(Self::extract_key_value_from_message)
            .or_else(|| Self::extract_key_value_from_message(message));

        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = key_value
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = key_value?;
        let entity = Self::extract_relation_from_message(message)
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Splits a `{table}_{column}_key` constraint name.
    ///
    /// The table is taken as the first underscore-separated segment, so
    /// `employees_email_key` yields `("employees", "email")`.
    pub fn parse_constraint_name(constraint: &str) -> Option<(String, String)> {
        let stem = constraint
            .strip_suffix("_key")
            .or_else(|| constraint.strip_suffix("_unique"))
            .or_else(|| constraint.strip_suffix("_idx"))?;
        let (entity, field) = stem.split_once('_')?;
        if entity.is_empty() || field.is_empty() {
            return None;
        }
        Some((entity.to_string(), field.to_string()))
    }

    /// Extracts `(field, value)` from a `Key (field)=(value)` fragment.
    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        Self::patterns()
            .key_value
            .captures(message)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
    }

    /// Extracts the quoted relation/table name, if any.
    pub fn extract_relation_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .relation_name
            .captures(message)
            .map(|caps| caps[1].to_string())
    }
}
