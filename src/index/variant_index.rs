//! Clause variant index
//!
//! Answers "have we already seen a clause equal up to variable renaming?".
//! Ground unit clauses take a plain hash-map fast path; general clauses are
//! keyed on a deterministically chosen *main* literal (largest arity,
//! ties broken by a variable-ignoring total order) in a per-header
//! discrimination trie, and candidates are confirmed by a full multiset
//! bijection check.

use super::disc_tree::{flatten, DiscTree, FlatKey};
use crate::fol::{FunctionId, LiteralId, PredicateId, TermBank};
use std::collections::HashMap;

/// Payload of the main-literal trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VariantEntry {
    clause: usize,
}

/// Variable-ignoring shape key used for the main-literal tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ShapeKey {
    Sym(FunctionId, u8),
    AnyVar,
}

fn shape_keys(lit: LiteralId, bank: &TermBank) -> Vec<ShapeKey> {
    let mut flat = Vec::new();
    for &arg in bank.literal_args(lit) {
        flatten(arg, bank, &mut flat);
    }
    flat.into_iter()
        .map(|k| match k {
            FlatKey::Sym(f, a) => ShapeKey::Sym(f, a),
            FlatKey::Var(_) => ShapeKey::AnyVar,
        })
        .collect()
}

/// Choose the main literal: largest arity, then the minimal literal under
/// the variable-ignoring total order. Renaming-invariant.
fn main_literal(literals: &[LiteralId], bank: &TermBank) -> LiteralId {
    let mut best = literals[0];
    let mut best_key = main_key(best, bank);
    for &lit in &literals[1..] {
        let key = main_key(lit, bank);
        if key < best_key {
            best = lit;
            best_key = key;
        }
    }
    best
}

type MainKey = (std::cmp::Reverse<u8>, PredicateId, bool, Vec<ShapeKey>);

fn main_key(lit: LiteralId, bank: &TermBank) -> MainKey {
    let (pred, polarity) = bank.literal_header(lit);
    (
        std::cmp::Reverse(bank.literal_args(lit).len() as u8),
        pred,
        polarity,
        shape_keys(lit, bank),
    )
}

/// Bijective variant check on literal multisets: is there a variable
/// bijection and a literal permutation making the two clauses identical?
pub fn are_variant_clauses(c: &[LiteralId], d: &[LiteralId], bank: &TermBank) -> bool {
    if c.len() != d.len() {
        return false;
    }
    let mut used = vec![false; d.len()];
    let mut fwd = HashMap::new();
    let mut bwd = HashMap::new();
    variant_rec(c, d, 0, &mut used, &mut fwd, &mut bwd, bank)
}

fn variant_rec(
    c: &[LiteralId],
    d: &[LiteralId],
    i: usize,
    used: &mut Vec<bool>,
    fwd: &mut HashMap<u32, u32>,
    bwd: &mut HashMap<u32, u32>,
    bank: &TermBank,
) -> bool {
    if i == c.len() {
        return true;
    }
    for j in 0..d.len() {
        if used[j] {
            continue;
        }
        if bank.literal_header(c[i]) != bank.literal_header(d[j]) {
            continue;
        }
        let mut trial_fwd = fwd.clone();
        let mut trial_bwd = bwd.clone();
        if literal_variant(c[i], d[j], &mut trial_fwd, &mut trial_bwd, bank) {
            used[j] = true;
            let saved_fwd = std::mem::replace(fwd, trial_fwd);
            let saved_bwd = std::mem::replace(bwd, trial_bwd);
            if variant_rec(c, d, i + 1, used, fwd, bwd, bank) {
                return true;
            }
            *fwd = saved_fwd;
            *bwd = saved_bwd;
            used[j] = false;
        }
    }
    false
}

fn literal_variant(
    a: LiteralId,
    b: LiteralId,
    fwd: &mut HashMap<u32, u32>,
    bwd: &mut HashMap<u32, u32>,
    bank: &TermBank,
) -> bool {
    let aargs = bank.literal_args(a);
    let bargs = bank.literal_args(b);
    aargs.len() == bargs.len()
        && aargs
            .iter()
            .zip(bargs.iter())
            .all(|(&x, &y)| term_variant(x, y, fwd, bwd, bank))
}

fn term_variant(
    a: crate::fol::TermId,
    b: crate::fol::TermId,
    fwd: &mut HashMap<u32, u32>,
    bwd: &mut HashMap<u32, u32>,
    bank: &TermBank,
) -> bool {
    use crate::fol::TermData;
    match (bank.term_data(a), bank.term_data(b)) {
        (TermData::Var(v), TermData::Var(w)) => {
            let ok_fwd = *fwd.entry(*v).or_insert(*w) == *w;
            let ok_bwd = *bwd.entry(*w).or_insert(*v) == *v;
            ok_fwd && ok_bwd
        }
        (
            TermData::App { functor: f, args: fa },
            TermData::App { functor: g, args: ga },
        ) => {
            f == g
                && fa.len() == ga.len()
                && fa
                    .iter()
                    .zip(ga.iter())
                    .all(|(&x, &y)| term_variant(x, y, fwd, bwd, bank))
        }
        _ => false,
    }
}

/// The clause variant index: ground-unit fast path plus main-literal tries.
#[derive(Debug, Default)]
pub struct ClauseVariantIndex {
    /// Ground unit clauses: literal handle -> clause index
    ground_units: HashMap<LiteralId, usize>,
    /// Empty clauses ever inserted
    empty_clauses: Vec<usize>,
    /// Main-literal tries per header
    shards: HashMap<(PredicateId, bool), DiscTree<VariantEntry>>,
    /// Literal lists of indexed clauses, for the confirmation check
    clauses: HashMap<usize, Vec<LiteralId>>,
}

impl ClauseVariantIndex {
    pub fn new() -> Self {
        ClauseVariantIndex::default()
    }

    pub fn insert(&mut self, clause: usize, literals: &[LiteralId], bank: &TermBank) {
        if literals.is_empty() {
            self.empty_clauses.push(clause);
            return;
        }
        if literals.len() == 1 && bank.literal_is_ground(literals[0]) {
            self.ground_units.entry(literals[0]).or_insert(clause);
            self.clauses.insert(clause, literals.to_vec());
            return;
        }
        let main = main_literal(literals, bank);
        let mut keys = Vec::new();
        for &arg in bank.literal_args(main) {
            flatten(arg, bank, &mut keys);
        }
        self.shards
            .entry(bank.literal_header(main))
            .or_default()
            .insert_keys(&keys, clause, VariantEntry { clause });
        self.clauses.insert(clause, literals.to_vec());
    }

    pub fn remove(&mut self, clause: usize, bank: &TermBank) {
        let _ = bank;
        if let Some(lits) = self.clauses.remove(&clause) {
            if lits.len() == 1 {
                if self.ground_units.get(&lits[0]) == Some(&clause) {
                    self.ground_units.remove(&lits[0]);
                }
            }
        }
        for shard in self.shards.values_mut() {
            shard.remove_clause(clause);
        }
        self.empty_clauses.retain(|&c| c != clause);
    }

    /// Find an indexed clause that is a variant of the query, if any.
    pub fn find_variant(&self, literals: &[LiteralId], bank: &TermBank) -> Option<usize> {
        if literals.is_empty() {
            return self.empty_clauses.first().copied();
        }
        if literals.len() == 1 && bank.literal_is_ground(literals[0]) {
            return self.ground_units.get(&literals[0]).copied();
        }
        let main = main_literal(literals, bank);
        let shard = self.shards.get(&bank.literal_header(main))?;
        let mut keys = Vec::new();
        for &arg in bank.literal_args(main) {
            flatten(arg, bank, &mut keys);
        }
        for entry in shard.candidates_variants(&keys) {
            if let Some(stored) = self.clauses.get(&entry.clause) {
                if are_variant_clauses(stored, literals, bank) {
                    return Some(entry.clause);
                }
            }
        }
        None
    }
}
