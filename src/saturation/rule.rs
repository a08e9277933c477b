//! Rule interfaces for the saturation loop
//!
//! Engines come in two capabilities. Generating rules derive new clauses
//! from the given clause against the active indexes; they never fail, at
//! worst they produce nothing. Simplifying rules either delete a clause,
//! or replace it by a single conclusion together with the premises
//! consumed; forward simplification targets the clause entering the
//! search, backward simplification prunes stored clauses against a fresh
//! activation.

use crate::fol::{Clause, LiteralId, TermBank, TermId, KBO};
use crate::index::SaturationIndexes;
use crate::proof::InferenceRule;

/// A clause produced by a generating rule, before insertion.
#[derive(Debug, Clone)]
pub struct Generated {
    pub literals: Vec<LiteralId>,
    pub rule: InferenceRule,
    pub premises: Vec<usize>,
    /// Rewriting metadata for rewriting rules
    pub rewrite: Option<(TermId, TermId)>,
}

impl Generated {
    pub fn new(literals: Vec<LiteralId>, rule: InferenceRule, premises: Vec<usize>) -> Self {
        Generated {
            literals,
            rule,
            premises,
            rewrite: None,
        }
    }
}

/// Outcome of a simplifying rule application.
#[derive(Debug, Clone)]
pub enum Simplification {
    /// The target clause is redundant and is deleted; `premises` names
    /// the clauses that make it so.
    Delete {
        target: usize,
        premises: Vec<usize>,
    },
    /// The target clause is replaced by a single conclusion.
    Replace {
        target: usize,
        literals: Vec<LiteralId>,
        rule: InferenceRule,
        premises: Vec<usize>,
        rewrite: Option<(TermId, TermId)>,
    },
}

/// Shared read/write context handed to rules.
///
/// The clause arena and indexes are read-only during rule application; the
/// bank is mutable because conclusions intern new terms.
pub struct RuleContext<'a> {
    pub clauses: &'a [Clause],
    pub indexes: &'a SaturationIndexes,
    pub bank: &'a mut TermBank,
    pub kbo: &'a KBO,
    /// Offset guaranteeing freshness when renaming the given clause apart
    pub rename_offset: u32,
}

/// A generating inference engine.
pub trait GeneratingRule {
    fn name(&self) -> &'static str;

    /// Produce all conclusions of the given clause against the active set.
    fn generate(&mut self, given: usize, ctx: &mut RuleContext<'_>) -> Vec<Generated>;

    /// Flush rule-internal counters (overflow skips, scheme counts) into
    /// the run statistics. Called after each `generate`.
    fn record_statistics(&mut self, _stats: &mut crate::statistics::Statistics) {}
}

/// A simplifying inference engine.
pub trait SimplifyingRule {
    fn name(&self) -> &'static str;

    /// Try to delete or rewrite the target clause using stored clauses.
    fn simplify_forward(&mut self, target: usize, ctx: &mut RuleContext<'_>)
        -> Option<Simplification>;

    /// Delete or rewrite stored clauses using the freshly activated clause.
    fn simplify_backward(&mut self, activated: usize, ctx: &mut RuleContext<'_>)
        -> Vec<Simplification>;
}
