//! Conflict resolution between mods supplying the same derived asset.
//!
//! Two mechanisms, consulted in order:
//!
//! 1. **Conflict rules** ([`ConflictRuleSet`]): persisted user decisions for
//!    specific mod combinations. A stored rule always overrides numeric
//!    priority.
//! 2. **Numeric priorities** ([`PriorityMatcher`]): each mod's priority is
//!    its position in the mod manager's ordered list; the highest-priority
//!    candidate wins, with a stability tie-break toward the currently
//!    assigned path.
//!
//! Both always produce *some* winner for a non-empty candidate set — an
//! ambiguous conflict is never an error.
//!
//! # Example
//!
//! ```
//! use vlo_match::{Candidate, ConflictRuleSet, ModPriorityTable, PriorityMatcher};
//!
//! let table = ModPriorityTable::from_ordered(&[
//!     "ModX".to_string(),
//!     "ModY".to_string(),
//! ]);
//! let matcher = PriorityMatcher::new(table, ConflictRuleSet::new());
//!
//! let candidates = [
//!     Candidate::new("mesh_a.dds", Some("ModX".to_string())),
//!     Candidate::new("mesh_b.dds", Some("ModY".to_string())),
//! ];
//!
//! // No rule stored, so ModY wins on priority.
//! assert_eq!(matcher.select_winner(&candidates, ""), Some("mesh_b.dds"));
//!
//! // A stored rule overrides the numeric outcome.
//! matcher.set_conflict_rule(
//!     vec!["ModX".to_string(), "ModY".to_string()],
//!     "ModX".to_string(),
//! );
//! let mods = vec!["ModX".to_string(), "ModY".to_string()];
//! assert_eq!(matcher.conflict_rule(&mods), Some("ModX".to_string()));
//! ```

pub mod error;
pub mod priority;
pub mod rules;

pub use error::{Error, Result};
pub use priority::{Candidate, ModPriorityTable, PriorityMatcher, UNKNOWN_PRIORITY};
pub use rules::{ConflictRule, ConflictRuleSet};
