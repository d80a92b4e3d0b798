// Tag Domain Model

use std::collections::BTreeMap;

/// Resolved tags for one object (key -> value)
pub type TagSet = BTreeMap<String, String>;

/// How a configured tag value is resolved for each fixture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagRule {
    /// Fresh random UUID
    Uuid,
    /// Hex digest of a fresh random UUID
    RandomHash,
    /// Uniform random timestamp between the fixed epoch and run start
    RandomDate,
    /// Current timestamp (any other rule containing "date")
    CurrentDate,
    /// Passed through unchanged
    Literal(String),
}

impl TagRule {
    /// Parse a rule string (case-insensitive)
    pub fn parse(rule: &str) -> Self {
        let lower = rule.to_lowercase();
        match lower.as_str() {
            "uuid" => TagRule::Uuid,
            "random_hash" => TagRule::RandomHash,
            "random_date" => TagRule::RandomDate,
            _ if lower.contains("date") => TagRule::CurrentDate,
            _ => TagRule::Literal(rule.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rules() {
        assert_eq!(TagRule::parse("UUID"), TagRule::Uuid);
        assert_eq!(TagRule::parse("Random_Hash"), TagRule::RandomHash);
        assert_eq!(TagRule::parse("random_date"), TagRule::RandomDate);
        assert_eq!(TagRule::parse("created_date"), TagRule::CurrentDate);
        assert_eq!(TagRule::parse("DATE"), TagRule::CurrentDate);
        assert_eq!(
            TagRule::parse("Staging"),
            TagRule::Literal("Staging".to_string())
        );
    }
}
