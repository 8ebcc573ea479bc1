//! A single binary combination record and its wire format (Shape A, §6).

use serde::{Deserialize, Serialize};
use std::fmt;

/// One `(result, left, right)` combination, stored in canonical left/right
/// form. Ingredients are unordered in meaning — `combinationsOf` callers
/// must check both `(left, right)` and `(right, left)` against a
/// candidate pair, which [`Combination::matches_pair`] does directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combination {
    pub result: String,
    pub left: String,
    pub right: String,
    pub tier: u32,
}

impl Combination {
    /// True if `(a, b)` is this combination's ingredient pair, in either order.
    pub fn matches_pair(&self, a: &str, b: &str) -> bool {
        (self.left == a && self.right == b) || (self.left == b && self.right == a)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} = {}", self.left, self.right, self.result)
    }
}

/// Raw on-disk record for Shape A: a flat array of
/// `{root, left, right, tier}`, with `tier` encoded as a decimal string —
/// the Go source's `json:"tier,string"` tag, preserved here so the
/// shipping database needs no reformatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCombinationRecord {
    pub root: String,
    #[serde(default)]
    pub left: String,
    #[serde(default)]
    pub right: String,
    #[serde(with = "tier_as_string")]
    pub tier: u32,
}

impl RawCombinationRecord {
    /// A record with an empty `left`/`right` names a basic element rather
    /// than a combination — see §6, Shape A.
    pub fn is_basic_marker(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

mod tier_as_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(tier: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&tier.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.trim()
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid tier {raw:?}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_pair_is_symmetric() {
        let c = Combination {
            result: "Mud".into(),
            left: "Earth".into(),
            right: "Water".into(),
            tier: 1,
        };
        assert!(c.matches_pair("Earth", "Water"));
        assert!(c.matches_pair("Water", "Earth"));
        assert!(!c.matches_pair("Earth", "Fire"));
    }

    #[test]
    fn raw_record_parses_decimal_string_tier() {
        let json = r#"{"root":"Mud","left":"Earth","right":"Water","tier":"1"}"#;
        let record: RawCombinationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.tier, 1);
        assert!(!record.is_basic_marker());
    }

    #[test]
    fn raw_record_with_empty_ingredients_is_basic_marker() {
        let json = r#"{"root":"Earth","left":"","right":"","tier":"0"}"#;
        let record: RawCombinationRecord = serde_json::from_str(json).unwrap();
        assert!(record.is_basic_marker());
    }
}
