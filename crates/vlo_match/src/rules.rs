//! Persisted manual conflict-resolution rules.
//!
//! Numeric priorities cannot express every decision a user makes; once a user
//! picks a winner for a particular combination of mods, that choice is stored
//! as a [`ConflictRule`] and replayed on later runs before the numeric
//! fallback. The table is the only state this engine persists between runs.

use crate::error::{Error, Result};
use camino::Utf8Path;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fs;

/// A user decision for one combination of conflicting mods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictRule {
    /// Mods that must all be present among the candidates (case preserved,
    /// order as registered).
    pub mods: Vec<String>,
    /// The mod whose variant wins.
    pub decision: String,
}

impl ConflictRule {
    fn same_mod_set(&self, other_mods: &[String]) -> bool {
        self.mods.len() == other_mods.len()
            && self.mods.iter().all(|m| other_mods.contains(m))
    }

    fn applies_to(&self, candidate_mods: &[String]) -> bool {
        self.mods.iter().all(|m| candidate_mods.contains(m))
            && candidate_mods.contains(&self.decision)
    }
}

/// Ordered rule table with first-registered-wins lookup.
///
/// A single lock guards the whole table: the compute-decide-insert sequence
/// two threads may race on must not double-insert a rule for the same set.
#[derive(Debug, Default)]
pub struct ConflictRuleSet {
    rules: Mutex<Vec<ConflictRule>>,
}

impl ConflictRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The decision mod for this candidate set, if a stored rule applies.
    ///
    /// A rule applies when every mod in its set is present among the
    /// candidates and its decision mod is one of the candidates. Rules are
    /// tried in registration order; the first match wins.
    pub fn get(&self, candidate_mods: &[String]) -> Option<String> {
        self.rules
            .lock()
            .iter()
            .find(|rule| rule.applies_to(candidate_mods))
            .map(|rule| rule.decision.clone())
    }

    /// Register a rule. Returns `false` when a rule for the same mod set
    /// (regardless of order) already exists; the stored rule is kept.
    pub fn set(&self, mods: Vec<String>, decision: String) -> bool {
        let mut rules = self.rules.lock();
        if rules.iter().any(|rule| rule.same_mod_set(&mods)) {
            return false;
        }
        tracing::debug!(
            "Conflict rule registered: [{}] -> {}",
            mods.join(", "),
            decision
        );
        rules.push(ConflictRule { mods, decision });
        true
    }

    pub fn len(&self) -> usize {
        self.rules.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.lock().is_empty()
    }

    /// Load rules from a JSON object mapping comma-joined mod sets to
    /// decision mods, preserving stored order. Replaces the current table.
    pub fn load(&self, path: &Utf8Path) -> Result<()> {
        let contents = fs::read_to_string(path.as_std_path())?;
        let object: Map<String, Value> = serde_json::from_str(&contents)?;

        let mut loaded = Vec::with_capacity(object.len());
        for (key, value) in &object {
            let decision = value.as_str().ok_or_else(|| {
                Error::MalformedRule(key.clone(), "decision must be a string".to_string())
            })?;
            let mods: Vec<String> = key
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
            if mods.is_empty() {
                return Err(Error::MalformedRule(
                    key.clone(),
                    "empty mod set".to_string(),
                ));
            }
            loaded.push(ConflictRule {
                mods,
                decision: decision.to_string(),
            });
        }

        tracing::debug!("Loaded {} conflict rules from {}", loaded.len(), path);
        *self.rules.lock() = loaded;
        Ok(())
    }

    /// Write the table back out in registration order.
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        let mut object = Map::new();
        for rule in self.rules.lock().iter() {
            object.insert(rule.mods.join(","), Value::String(rule.decision.clone()));
        }
        let contents = serde_json::to_string_pretty(&Value::Object(object))?;
        fs::write(path.as_std_path(), contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn mods(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_rule_applies_when_set_and_decision_present() {
        let rules = ConflictRuleSet::new();
        assert!(rules.set(mods(&["ModA", "ModB"]), "ModA".to_string()));

        assert_eq!(rules.get(&mods(&["ModA", "ModB"])), Some("ModA".to_string()));
        // A superset of the rule's mods still satisfies it.
        assert_eq!(
            rules.get(&mods(&["ModA", "ModB", "ModC"])),
            Some("ModA".to_string())
        );
        // Missing rule mod, no match.
        assert_eq!(rules.get(&mods(&["ModA", "ModC"])), None);
    }

    #[test]
    fn test_decision_must_be_among_candidates() {
        let rules = ConflictRuleSet::new();
        assert!(rules.set(mods(&["ModA"]), "ModZ".to_string()));
        // ModA is present but the decision mod is not a candidate.
        assert_eq!(rules.get(&mods(&["ModA", "ModB"])), None);
        assert_eq!(
            rules.get(&mods(&["ModA", "ModZ"])),
            Some("ModZ".to_string())
        );
    }

    #[test]
    fn test_no_duplicate_mod_sets() {
        let rules = ConflictRuleSet::new();
        assert!(rules.set(mods(&["ModA", "ModB"]), "ModA".to_string()));
        // Same set, different order and decision: rejected, first rule stays.
        assert!(!rules.set(mods(&["ModB", "ModA"]), "ModB".to_string()));
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.get(&mods(&["ModA", "ModB"])), Some("ModA".to_string()));
    }

    #[test]
    fn test_first_registered_rule_wins() {
        let rules = ConflictRuleSet::new();
        assert!(rules.set(mods(&["ModA"]), "ModA".to_string()));
        assert!(rules.set(mods(&["ModA", "ModB"]), "ModB".to_string()));
        // Both rules apply to {A, B}; the earlier registration decides.
        assert_eq!(rules.get(&mods(&["ModA", "ModB"])), Some("ModA".to_string()));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("mod_rules.json")).unwrap();

        let rules = ConflictRuleSet::new();
        rules.set(mods(&["High Poly Mod", "Parallax Mod"]), "Parallax Mod".to_string());
        rules.set(mods(&["ModA"]), "ModA".to_string());
        rules.save(&path).unwrap();

        let loaded = ConflictRuleSet::new();
        loaded.load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(
            loaded.get(&mods(&["High Poly Mod", "Parallax Mod"])),
            Some("Parallax Mod".to_string())
        );
        // Registration order survives the round trip.
        assert_eq!(
            loaded.get(&mods(&["High Poly Mod", "Parallax Mod", "ModA"])),
            Some("Parallax Mod".to_string())
        );
    }

    #[test]
    fn test_load_rejects_non_string_decision() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("mod_rules.json")).unwrap();
        std::fs::write(path.as_std_path(), br#"{"ModA,ModB": 3}"#).unwrap();

        let rules = ConflictRuleSet::new();
        assert!(matches!(
            rules.load(&path),
            Err(Error::MalformedRule(_, _))
        ));
    }
}
