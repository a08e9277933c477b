//! Literal index
//!
//! Shards one discrimination trie per `(predicate, polarity)` header and
//! indexes the concatenated argument key paths of literals. Payloads carry
//! the owning clause and the literal's position in it. Used by resolution
//! (complementary unifications), demodulation (generalizations and
//! instances of unit equality sides), and the subsumption prefilter.

use super::disc_tree::{flatten, DiscTree, FlatKey};
use crate::fol::{
    match_literal, unify_args, Binder, LiteralId, PredicateId, Substitution, TermBank,
};
use std::collections::HashMap;

/// Index payload: the stored literal plus its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LitEntry {
    pub literal: LiteralId,
    pub clause: usize,
    pub position: usize,
}

/// Literal index over `(predicate, polarity)`-sharded tries.
#[derive(Debug, Default)]
pub struct LiteralIndex {
    shards: HashMap<(PredicateId, bool), DiscTree<LitEntry>>,
}

fn literal_keys(lit: LiteralId, bank: &TermBank) -> Vec<FlatKey> {
    let mut keys = Vec::new();
    for &arg in bank.literal_args(lit) {
        flatten(arg, bank, &mut keys);
    }
    keys
}

impl LiteralIndex {
    pub fn new() -> Self {
        LiteralIndex::default()
    }

    pub fn len(&self) -> usize {
        self.shards.values().map(|t| t.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(&mut self, lit: LiteralId, clause: usize, position: usize, bank: &TermBank) {
        let keys = literal_keys(lit, bank);
        let shard = self
            .shards
            .entry(bank.literal_header(lit))
            .or_default();
        shard.insert_keys(
            &keys,
            clause,
            LitEntry {
                literal: lit,
                clause,
                position,
            },
        );
    }

    pub fn remove_clause(&mut self, clause: usize) {
        for shard in self.shards.values_mut() {
            shard.remove_clause(clause);
        }
    }

    /// Stored literals that generalize the query literal (same header).
    pub fn generalizations(
        &self,
        query: LiteralId,
        bank: &TermBank,
    ) -> Vec<(LitEntry, Substitution)> {
        let shard = match self.shards.get(&bank.literal_header(query)) {
            Some(s) => s,
            None => return Vec::new(),
        };
        let keys = literal_keys(query, bank);
        shard
            .candidates_generalizations(&keys)
            .into_iter()
            .filter_map(|e| {
                let mut subst = Substitution::new();
                let mut binder = Binder::new();
                if match_literal(e.literal, query, &mut subst, &mut binder, bank) {
                    binder.commit();
                    Some((e, subst))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Stored literals that are instances of the query literal.
    pub fn instances(&self, query: LiteralId, bank: &TermBank) -> Vec<(LitEntry, Substitution)> {
        let shard = match self.shards.get(&bank.literal_header(query)) {
            Some(s) => s,
            None => return Vec::new(),
        };
        let keys = literal_keys(query, bank);
        shard
            .candidates_instances(&keys)
            .into_iter()
            .filter_map(|e| {
                let mut subst = Substitution::new();
                let mut binder = Binder::new();
                if match_literal(query, e.literal, &mut subst, &mut binder, bank) {
                    binder.commit();
                    Some((e, subst))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Stored literals of the opposite polarity whose atoms unify with the
    /// query atom. The caller renames the query clause apart first.
    pub fn complementary_unifications(
        &self,
        query: LiteralId,
        bank: &TermBank,
    ) -> Vec<(LitEntry, Substitution)> {
        let (pred, polarity) = bank.literal_header(query);
        let shard = match self.shards.get(&(pred, !polarity)) {
            Some(s) => s,
            None => return Vec::new(),
        };
        let keys = literal_keys(query, bank);
        shard
            .candidates_unifications(&keys)
            .into_iter()
            .filter_map(|e| unify_args(e.literal, query, bank).map(|s| (e, s)))
            .collect()
    }
}
