//! Indexing substrate for the saturation loop
//!
//! Indexes hold weak references (clause index + generation tag) into the
//! clause store and are kept in sync by routed lifecycle events:
//! - `on_activated`: the clause joined the active set and starts answering
//!   queries
//! - `on_removed`: the clause left the active set (deleted or reactivated)
//!
//! `SaturationIndexes` owns one instance of each concrete index and routes
//! events to all of them; rules access the index they need through typed
//! accessors, so dispatch stays a plain field read.

pub mod disc_tree;
pub mod literal_index;
pub mod variant_index;

pub use disc_tree::{flatten, DiscTree, FlatKey, TermEntry, TermIndex};
pub use literal_index::{LitEntry, LiteralIndex};
pub use variant_index::{are_variant_clauses, ClauseVariantIndex};

use crate::fol::{Clause, TermBank, TermData, TermId};

/// Lifecycle notifications every index implements.
pub trait Index {
    /// A clause became active and must start answering queries.
    fn on_activated(&mut self, idx: usize, clause: &Clause, bank: &TermBank);

    /// A clause left the active set; its entries must never be returned
    /// again.
    fn on_removed(&mut self, idx: usize, clause: &Clause, bank: &TermBank);
}

// =============================================================================
// Concrete saturation indexes
// =============================================================================

/// Index of the selected literals of active clauses, for resolution.
#[derive(Debug, Default)]
pub struct SelectedLiteralIndex {
    pub literals: LiteralIndex,
}

impl Index for SelectedLiteralIndex {
    fn on_activated(&mut self, idx: usize, clause: &Clause, bank: &TermBank) {
        for (pos, &lit) in clause.selected_literals().iter().enumerate() {
            self.literals.insert(lit, idx, pos, bank);
        }
    }

    fn on_removed(&mut self, idx: usize, _clause: &Clause, _bank: &TermBank) {
        self.literals.remove_clause(idx);
    }
}

/// Index of non-variable subterms of selected literals, the "into" side of
/// superposition.
#[derive(Debug, Default)]
pub struct SubtermIndex {
    pub terms: TermIndex,
}

impl Index for SubtermIndex {
    fn on_activated(&mut self, idx: usize, clause: &Clause, bank: &TermBank) {
        for (pos, &lit) in clause.selected_literals().iter().enumerate() {
            for &arg in bank.literal_args(lit) {
                for sub in bank.subterms(arg) {
                    if !matches!(bank.term_data(sub), TermData::Var(_)) {
                        self.terms.insert(sub, idx, pos, bank);
                    }
                }
            }
        }
    }

    fn on_removed(&mut self, idx: usize, _clause: &Clause, _bank: &TermBank) {
        self.terms.remove_clause(idx);
    }
}

/// Index of the oriented sides of selected positive equalities, the "from"
/// side of superposition and the source of demodulators.
#[derive(Debug, Default)]
pub struct EqualityLhsIndex {
    pub terms: TermIndex,
}

impl EqualityLhsIndex {
    fn equality_sides(clause: &Clause, bank: &TermBank) -> Vec<(usize, TermId)> {
        let mut sides = Vec::new();
        for (pos, &lit) in clause.selected_literals().iter().enumerate() {
            if bank.literal_polarity(lit) && bank.is_equality(lit) {
                let args = bank.literal_args(lit);
                sides.push((pos, args[0]));
                sides.push((pos, args[1]));
            }
        }
        sides
    }
}

impl Index for EqualityLhsIndex {
    fn on_activated(&mut self, idx: usize, clause: &Clause, bank: &TermBank) {
        for (pos, side) in Self::equality_sides(clause, bank) {
            if !matches!(bank.term_data(side), TermData::Var(_)) {
                self.terms.insert(side, idx, pos, bank);
            }
        }
    }

    fn on_removed(&mut self, idx: usize, _clause: &Clause, _bank: &TermBank) {
        self.terms.remove_clause(idx);
    }
}

/// Set of active unit equalities usable as demodulators.
#[derive(Debug, Default)]
pub struct UnitEqualityIndex {
    pub units: indexmap::IndexSet<usize>,
}

impl UnitEqualityIndex {
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.units.iter().copied()
    }

    fn is_unit_equality(clause: &Clause, bank: &TermBank) -> bool {
        clause.literals.len() == 1
            && bank.literal_polarity(clause.literals[0])
            && bank.is_equality(clause.literals[0])
    }
}

impl Index for UnitEqualityIndex {
    fn on_activated(&mut self, idx: usize, clause: &Clause, bank: &TermBank) {
        if Self::is_unit_equality(clause, bank) {
            self.units.insert(idx);
        }
    }

    fn on_removed(&mut self, idx: usize, _clause: &Clause, _bank: &TermBank) {
        self.units.shift_remove(&idx);
    }
}

/// All literals of active clauses, used by subsumption candidate filtering
/// and backward simplification.
#[derive(Debug, Default)]
pub struct ActiveLiteralIndex {
    pub literals: LiteralIndex,
}

impl Index for ActiveLiteralIndex {
    fn on_activated(&mut self, idx: usize, clause: &Clause, bank: &TermBank) {
        for (pos, &lit) in clause.literals.iter().enumerate() {
            self.literals.insert(lit, idx, pos, bank);
        }
    }

    fn on_removed(&mut self, idx: usize, _clause: &Clause, _bank: &TermBank) {
        self.literals.remove_clause(idx);
    }
}

/// The index family over the active set, owned by the saturation loop.
/// Events are routed to every member so each completed insert/remove is
/// observed before the next query. (The clause variant index spans
/// passive and active and is maintained by the saturation state itself.)
#[derive(Debug, Default)]
pub struct SaturationIndexes {
    pub selected: SelectedLiteralIndex,
    pub subterms: SubtermIndex,
    pub equality_lhs: EqualityLhsIndex,
    pub unit_equalities: UnitEqualityIndex,
    pub active_literals: ActiveLiteralIndex,
}

impl SaturationIndexes {
    pub fn new() -> Self {
        SaturationIndexes::default()
    }

    pub fn on_activated(&mut self, idx: usize, clause: &Clause, bank: &TermBank) {
        self.selected.on_activated(idx, clause, bank);
        self.subterms.on_activated(idx, clause, bank);
        self.equality_lhs.on_activated(idx, clause, bank);
        self.unit_equalities.on_activated(idx, clause, bank);
        self.active_literals.on_activated(idx, clause, bank);
    }

    pub fn on_removed(&mut self, idx: usize, clause: &Clause, bank: &TermBank) {
        self.selected.on_removed(idx, clause, bank);
        self.subterms.on_removed(idx, clause, bank);
        self.equality_lhs.on_removed(idx, clause, bank);
        self.unit_equalities.on_removed(idx, clause, bank);
        self.active_literals.on_removed(idx, clause, bank);
    }
}
