//! Numeric per-mod priorities and winner selection.
//!
//! When several mods supply conflicting variants of the same derived asset,
//! [`PriorityMatcher::select_winner`] picks one deterministically: highest
//! numeric priority wins, with a stability preference for whatever is already
//! assigned. Callers consult the [`conflict rules`](crate::rules) first; the
//! numeric path only runs when no stored rule decides the set.

use crate::rules::ConflictRuleSet;
use std::collections::HashMap;
use vlo_index::paths::paths_equal_ignore_case;

/// Priority lookup built from the mod manager's ordered mod list.
///
/// A mod's priority is its position in that list, so later mods (which the
/// manager lets overwrite earlier ones) rank higher. Mods absent from the
/// list rank below everything at `-1`.
#[derive(Debug, Clone, Default)]
pub struct ModPriorityTable {
    priorities: HashMap<String, i64>,
}

pub const UNKNOWN_PRIORITY: i64 = -1;

impl ModPriorityTable {
    /// Build the table from mods in ascending priority order.
    pub fn from_ordered(mods: &[String]) -> Self {
        let priorities = mods
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i as i64))
            .collect();
        Self { priorities }
    }

    pub fn priority_of(&self, label: &str) -> i64 {
        self.priorities.get(label).copied().unwrap_or(UNKNOWN_PRIORITY)
    }

    pub fn len(&self) -> usize {
        self.priorities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }
}

/// One variant of a contested asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Logical path of the variant.
    pub path: String,
    /// Mod that contributed it; `None` ranks as unknown.
    pub owning_mod: Option<String>,
}

impl Candidate {
    pub fn new(path: impl Into<String>, owning_mod: Option<String>) -> Self {
        Self {
            path: path.into(),
            owning_mod,
        }
    }
}

/// Selects winners among conflicting asset variants.
///
/// The priority table is fixed at construction; the conflict-rule set is
/// shared and may grow during a run.
pub struct PriorityMatcher {
    table: ModPriorityTable,
    rules: ConflictRuleSet,
}

impl PriorityMatcher {
    pub fn new(table: ModPriorityTable, rules: ConflictRuleSet) -> Self {
        Self { table, rules }
    }

    pub fn priority_table(&self) -> &ModPriorityTable {
        &self.table
    }

    pub fn rules(&self) -> &ConflictRuleSet {
        &self.rules
    }

    /// Stored decision for this candidate mod set, if any rule applies.
    pub fn conflict_rule(&self, candidate_mods: &[String]) -> Option<String> {
        self.rules.get(candidate_mods)
    }

    /// Register a manual decision for a mod set. Returns `false` when a rule
    /// for the same set already exists; the existing rule stays in effect.
    pub fn set_conflict_rule(&self, mods: Vec<String>, decision: String) -> bool {
        self.rules.set(mods, decision)
    }

    /// Pick the winning path among candidates.
    ///
    /// Candidates at the maximum numeric priority are retained; among those,
    /// a candidate whose path case-insensitively equals `currently_assigned`
    /// wins outright, otherwise the first retained candidate wins. Callers
    /// must present candidates in a fixed order for reproducible results.
    ///
    /// Returns `None` only for an empty candidate slice.
    pub fn select_winner<'a>(
        &self,
        candidates: &'a [Candidate],
        currently_assigned: &str,
    ) -> Option<&'a str> {
        let max_priority = candidates
            .iter()
            .map(|c| self.candidate_priority(c))
            .max()?;

        let mut retained = candidates
            .iter()
            .filter(|c| self.candidate_priority(c) == max_priority);

        let first = retained.next()?;
        if paths_equal_ignore_case(&first.path, currently_assigned) {
            return Some(&first.path);
        }
        for candidate in retained {
            if paths_equal_ignore_case(&candidate.path, currently_assigned) {
                return Some(&candidate.path);
            }
        }
        Some(&first.path)
    }

    fn candidate_priority(&self, candidate: &Candidate) -> i64 {
        candidate
            .owning_mod
            .as_deref()
            .map_or(UNKNOWN_PRIORITY, |label| self.table.priority_of(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(ordered: &[&str]) -> PriorityMatcher {
        let mods: Vec<String> = ordered.iter().map(|s| (*s).to_string()).collect();
        PriorityMatcher::new(ModPriorityTable::from_ordered(&mods), ConflictRuleSet::new())
    }

    fn candidate(path: &str, owner: &str) -> Candidate {
        Candidate::new(path, Some(owner.to_string()))
    }

    #[test]
    fn test_priority_table_ordering() {
        let table = ModPriorityTable::from_ordered(&[
            "ModA".to_string(),
            "ModB".to_string(),
            "ModC".to_string(),
        ]);
        assert_eq!(table.priority_of("ModA"), 0);
        assert_eq!(table.priority_of("ModC"), 2);
        assert_eq!(table.priority_of("Unknown"), UNKNOWN_PRIORITY);
    }

    #[test]
    fn test_highest_priority_wins() {
        let m = matcher(&["ModW", "ModV", "ModX", "ModY"]);
        let candidates = [
            candidate("mesh_a.dds", "ModX"),
            candidate("mesh_b.dds", "ModY"),
        ];
        assert_eq!(m.select_winner(&candidates, ""), Some("mesh_b.dds"));
    }

    #[test]
    fn test_unknown_mod_ranks_lowest() {
        let m = matcher(&["ModX"]);
        let candidates = [
            candidate("stranger.dds", "Nobody"),
            candidate("known.dds", "ModX"),
        ];
        assert_eq!(m.select_winner(&candidates, ""), Some("known.dds"));

        let unowned = [
            Candidate::new("orphan.dds", None),
            candidate("known.dds", "ModX"),
        ];
        assert_eq!(m.select_winner(&unowned, ""), Some("known.dds"));
    }

    #[test]
    fn test_tie_prefers_currently_assigned() {
        let m = matcher(&["ModX"]);
        let candidates = [
            candidate("mesh_a.dds", "ModX"),
            candidate("mesh_b.dds", "ModX"),
        ];
        assert_eq!(
            m.select_winner(&candidates, "MESH_B.DDS"),
            Some("mesh_b.dds")
        );
    }

    #[test]
    fn test_tie_without_assignment_takes_first() {
        let m = matcher(&["ModX"]);
        let candidates = [
            candidate("mesh_a.dds", "ModX"),
            candidate("mesh_b.dds", "ModX"),
        ];
        assert_eq!(m.select_winner(&candidates, ""), Some("mesh_a.dds"));
    }

    #[test]
    fn test_assignment_outside_retained_set_is_ignored() {
        let m = matcher(&["ModLow", "ModHigh"]);
        let candidates = [
            candidate("low.dds", "ModLow"),
            candidate("high.dds", "ModHigh"),
        ];
        // low.dds is assigned but loses on priority.
        assert_eq!(m.select_winner(&candidates, "low.dds"), Some("high.dds"));
    }

    #[test]
    fn test_determinism() {
        let m = matcher(&["ModX", "ModY"]);
        let candidates = [
            candidate("mesh_a.dds", "ModX"),
            candidate("mesh_b.dds", "ModY"),
        ];
        let first = m.select_winner(&candidates, "").map(String::from);
        for _ in 0..10 {
            assert_eq!(m.select_winner(&candidates, "").map(String::from), first);
        }
    }

    #[test]
    fn test_empty_candidates() {
        let m = matcher(&["ModX"]);
        assert_eq!(m.select_winner(&[], ""), None);
    }
}
