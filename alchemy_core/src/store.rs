//! The combination store: an immutable, indexed view over the combination
//! database (§4.1).

use std::collections::{BTreeMap, BTreeSet};

use crate::combination::{Combination, RawCombinationRecord};
use crate::element::{self, Tier, BASIC_ELEMENTS};
use crate::errors::Error;

/// Immutable bundle of indexes over the combination database.
///
/// There is no way to construct a `Store` other than [`Store::load`]
/// succeeding, so the "lookups on an unloaded store" failure mode the
/// original solver had to guard against at runtime (its combination map
/// was a package-level `nil` until `LoadCombinations` ran) cannot occur
/// here at all — a half-built `Store` is not a value that exists.
#[derive(Debug, Clone)]
pub struct Store {
    forward: BTreeMap<String, Vec<Combination>>,
    tiers: BTreeMap<String, u32>,
    consumers: BTreeMap<String, BTreeSet<String>>,
    /// Lowercased name -> canonical (as-stored) name, covering every
    /// element the store has ever seen. Lets query-time lookups be
    /// case-insensitive across the whole store, not just the basic set
    /// (§9 open question (b): normalize "uniformly at load and at query
    /// parse", not only at the basic-element boundary).
    case_index: BTreeMap<String, String>,
}

impl Store {
    /// Parse a Shape A combination database (§6) and build the forward,
    /// tier, and reverse indexes. Duplicate combinations collapse to one;
    /// basic elements are wired in at tier 0 independently of the source.
    pub fn load(source: &str) -> Result<Store, Error> {
        let records: Vec<RawCombinationRecord> =
            serde_json::from_str(source).map_err(|e| Error::LoadFailure {
                message: e.to_string(),
            })?;
        Ok(Self::from_records(records))
    }

    fn from_records(records: Vec<RawCombinationRecord>) -> Store {
        let mut forward: BTreeMap<String, Vec<Combination>> = BTreeMap::new();
        let mut tiers: BTreeMap<String, u32> = BTreeMap::new();
        let mut consumers: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut seen_combos: BTreeSet<(String, String, String)> = BTreeSet::new();
        let mut case_index: BTreeMap<String, String> = BTreeMap::new();

        for basic in BASIC_ELEMENTS {
            tiers.insert(basic.to_string(), 0);
            case_index.insert(basic.to_ascii_lowercase(), basic.to_string());
        }

        for record in records {
            tiers.entry(record.result.clone()).or_insert(record.tier);
            case_index
                .entry(record.result.to_ascii_lowercase())
                .or_insert_with(|| record.result.clone());
            if record.is_basic_marker() {
                continue;
            }
            case_index
                .entry(record.left.to_ascii_lowercase())
                .or_insert_with(|| record.left.clone());
            case_index
                .entry(record.right.to_ascii_lowercase())
                .or_insert_with(|| record.right.clone());
            let key = (
                record.result.clone(),
                record.left.clone(),
                record.right.clone(),
            );
            if !seen_combos.insert(key) {
                continue;
            }
            consumers
                .entry(record.left.clone())
                .or_default()
                .insert(record.result.clone());
            consumers
                .entry(record.right.clone())
                .or_default()
                .insert(record.result.clone());
            forward.entry(record.result.clone()).or_default().push(Combination {
                result: record.result,
                left: record.left,
                right: record.right,
                tier: record.tier,
            });
        }

        Store {
            forward,
            tiers,
            consumers,
            case_index,
        }
    }

    /// Normalize a query-time element name to the store's canonical casing:
    /// trimmed, then case-insensitively matched against every element name
    /// the store has ever seen (not just the basic set). Names the store
    /// doesn't recognize under any casing are returned trimmed but
    /// otherwise unchanged, and will simply miss every lookup as unknown.
    pub fn normalize(&self, name: &str) -> String {
        let trimmed = name.trim();
        self.case_index
            .get(&trimmed.to_ascii_lowercase())
            .cloned()
            .unwrap_or_else(|| trimmed.to_string())
    }

    /// All combinations whose result is `element`, in database order.
    /// Unknown elements yield an empty slice.
    pub fn combinations_of(&self, element: &str) -> &[Combination] {
        self.forward.get(element).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `tier(element)`, or [`Tier::Unknown`] if the store has never seen it.
    pub fn tier_of(&self, element: &str) -> Tier {
        self.tiers
            .get(element)
            .copied()
            .map(Tier::Known)
            .unwrap_or(Tier::Unknown)
    }

    /// True for the fixed basic-element set, regardless of database content.
    pub fn is_basic(&self, element: &str) -> bool {
        element::is_basic_name(element)
    }

    /// All elements that consume `element` as one of their two ingredients
    /// in at least one combination (reverse index, §4.1).
    pub fn consumers_of(&self, element: &str) -> Vec<String> {
        self.consumers
            .get(element)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// A tier-monotone combination producing `element`: both ingredients
    /// have strictly lower tier than `element` itself. Violations in the
    /// raw database are filtered here, not at load time (§3).
    pub fn tier_monotone_combinations_of(&self, element: &str) -> impl Iterator<Item = &Combination> {
        let result_tier = self.tier_of(element);
        self.combinations_of(element).iter().filter(move |c| {
            self.tier_of(&c.left).strictly_less_than(result_tier)
                && self.tier_of(&c.right).strictly_less_than(result_tier)
        })
    }

    /// Total number of distinct elements the store has a tier for.
    pub fn element_count(&self) -> usize {
        self.tiers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"[
            {"root":"Mud","left":"Earth","right":"Water","tier":"1"},
            {"root":"Mud","left":"Earth","right":"Water","tier":"1"},
            {"root":"Lava","left":"Earth","right":"Fire","tier":"1"},
            {"root":"Steam","left":"Water","right":"Fire","tier":"1"}
        ]"#
    }

    #[test]
    fn load_wires_in_basics_independently_of_source() {
        let store = Store::load(sample_json()).unwrap();
        assert!(store.is_basic("Earth"));
        assert_eq!(store.tier_of("Earth"), Tier::Known(0));
    }

    #[test]
    fn duplicate_combinations_collapse_to_one() {
        let store = Store::load(sample_json()).unwrap();
        assert_eq!(store.combinations_of("Mud").len(), 1);
    }

    #[test]
    fn unknown_element_yields_unknown_tier_and_empty_combinations() {
        let store = Store::load(sample_json()).unwrap();
        assert_eq!(store.tier_of("Phlogiston"), Tier::Unknown);
        assert!(store.combinations_of("Phlogiston").is_empty());
    }

    #[test]
    fn reverse_index_tracks_consumers() {
        let store = Store::load(sample_json()).unwrap();
        let consumers = store.consumers_of("Earth");
        assert!(consumers.contains(&"Mud".to_string()));
        assert!(consumers.contains(&"Lava".to_string()));
    }

    #[test]
    fn unparseable_source_is_a_load_failure() {
        let err = Store::load("not json").unwrap_err();
        assert!(matches!(err, Error::LoadFailure { .. }));
    }

    #[test]
    fn normalize_matches_derived_elements_case_insensitively() {
        let store = Store::load(sample_json()).unwrap();
        assert_eq!(store.normalize("mud"), "Mud");
        assert_eq!(store.normalize("LAVA"), "Lava");
        assert_eq!(store.normalize("  steam "), "Steam");
    }

    #[test]
    fn normalize_matches_basics_case_insensitively() {
        let store = Store::load(sample_json()).unwrap();
        assert_eq!(store.normalize("EARTH"), "Earth");
    }

    #[test]
    fn normalize_leaves_unknown_names_trimmed_but_unchanged() {
        let store = Store::load(sample_json()).unwrap();
        assert_eq!(store.normalize("  Phlogiston "), "Phlogiston");
    }

    #[test]
    fn tier_monotone_filter_drops_non_monotone_entries() {
        let json = r#"[
            {"root":"Weird","left":"Mud","right":"Earth","tier":"1"},
            {"root":"Mud","left":"Earth","right":"Water","tier":"1"}
        ]"#;
        let store = Store::load(json).unwrap();
        // Weird is tier 1, same as its ingredient Mud (also tier 1) - not monotone.
        assert_eq!(store.tier_monotone_combinations_of("Weird").count(), 0);
        assert_eq!(store.tier_monotone_combinations_of("Mud").count(), 1);
    }
}
