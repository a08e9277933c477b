//! Subsumption and subsumption resolution as simplifying rules
//!
//! Thin adapter over the constraint-based engine in `crate::subsumption`.
//! Candidate side premises are prefiltered through the active-literal
//! index: a subsuming clause must have every literal generalize some
//! literal of the target, so any of its literals retrieves it.

use crate::proof::InferenceRule;
use crate::saturation::rule::{RuleContext, Simplification, SimplifyingRule};
use crate::subsumption::SubsumptionEngine;

pub struct SubsumptionRule {
    engine: SubsumptionEngine,
    /// Whether subsumption resolution is enabled (configuration)
    resolution: bool,
}

impl SubsumptionRule {
    pub fn new(resolution: bool) -> Self {
        SubsumptionRule {
            engine: SubsumptionEngine::new(),
            resolution,
        }
    }
}

impl SimplifyingRule for SubsumptionRule {
    fn name(&self) -> &'static str {
        "subsumption"
    }

    fn simplify_forward(
        &mut self,
        target: usize,
        ctx: &mut RuleContext<'_>,
    ) -> Option<Simplification> {
        let clauses = ctx.clauses;
        let indexes = ctx.indexes;
        let bank = &mut *ctx.bank;

        let target_literals = clauses[target].literals.clone();
        if target_literals.is_empty() {
            return None;
        }

        // Candidate subsumers: active clauses with a literal generalizing
        // some target literal (complement too, for the SR side premise)
        let mut candidates: Vec<usize> = Vec::new();
        for &lit in &target_literals {
            for (entry, _) in indexes.active_literals.literals.generalizations(lit, bank) {
                if entry.clause != target && !candidates.contains(&entry.clause) {
                    candidates.push(entry.clause);
                }
            }
            let complement = bank.complement(lit);
            for (entry, _) in indexes
                .active_literals
                .literals
                .generalizations(complement, bank)
            {
                if entry.clause != target && !candidates.contains(&entry.clause) {
                    candidates.push(entry.clause);
                }
            }
        }

        // Forward subsumption: delete the target outright
        for &cand in &candidates {
            let side = &clauses[cand].literals;
            if side.len() > target_literals.len() {
                continue;
            }
            if self.engine.subsumes(side, &target_literals, bank) {
                return Some(Simplification::Delete {
                    target,
                    premises: vec![cand],
                });
            }
        }

        // Forward subsumption resolution: cut one literal out
        if self.resolution {
            for &cand in &candidates {
                let side = clauses[cand].literals.clone();
                if let Some((conclusion, _resolved)) =
                    self.engine
                        .subsumption_resolution(&side, &target_literals, bank)
                {
                    return Some(Simplification::Replace {
                        target,
                        literals: conclusion,
                        rule: InferenceRule::SubsumptionResolution,
                        premises: vec![target, cand],
                        rewrite: None,
                    });
                }
            }
        }

        None
    }

    fn simplify_backward(
        &mut self,
        activated: usize,
        ctx: &mut RuleContext<'_>,
    ) -> Vec<Simplification> {
        let clauses = ctx.clauses;
        let indexes = ctx.indexes;
        let bank = &mut *ctx.bank;

        let side = clauses[activated].literals.clone();
        if side.is_empty() {
            return Vec::new();
        }

        // A subsumed clause contains an instance of every side literal,
        // so instances of the first literal retrieve all candidates
        let mut out = Vec::new();
        let mut seen: Vec<usize> = Vec::new();
        for (entry, _) in indexes
            .active_literals
            .literals
            .instances(side[0], bank)
        {
            let cand = entry.clause;
            if cand == activated || seen.contains(&cand) {
                continue;
            }
            seen.push(cand);
            let target_literals = &clauses[cand].literals;
            if target_literals.len() < side.len() {
                continue;
            }
            if self.engine.subsumes(&side, target_literals, bank) {
                out.push(Simplification::Delete {
                    target: cand,
                    premises: vec![activated],
                });
            }
        }
        out
    }
}
