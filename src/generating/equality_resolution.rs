//! Equality resolution
//!
//! From `s ≠ t ∨ C` with σ = mgu(s, t), derive `Cσ`.

use super::common::{normalize_clause_vars, remove_duplicate_literals};
use crate::fol::unify;
use crate::proof::InferenceRule;
use crate::saturation::rule::{Generated, GeneratingRule, RuleContext};

pub struct EqualityResolutionRule;

impl EqualityResolutionRule {
    pub fn new() -> Self {
        EqualityResolutionRule
    }
}

impl Default for EqualityResolutionRule {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratingRule for EqualityResolutionRule {
    fn name(&self) -> &'static str {
        "equality_resolution"
    }

    fn generate(&mut self, given: usize, ctx: &mut RuleContext<'_>) -> Vec<Generated> {
        let clauses = ctx.clauses;
        let bank = &mut *ctx.bank;

        let clause = &clauses[given];
        let mut out = Vec::new();

        for pos in 0..clause.selected {
            let lit = clause.literals[pos];
            if bank.literal_polarity(lit) || !bank.is_equality(lit) {
                continue;
            }
            let args = bank.literal_args(lit);
            let (s, t) = (args[0], args[1]);
            if let Some(sigma) = unify(s, t, bank) {
                let mut literals = Vec::with_capacity(clause.literals.len() - 1);
                for (p, &l) in clause.literals.iter().enumerate() {
                    if p == pos {
                        continue;
                    }
                    literals.push(sigma.apply_literal(l, bank));
                }
                let literals = remove_duplicate_literals(literals);
                let literals = normalize_clause_vars(&literals, bank);
                out.push(Generated::new(
                    literals,
                    InferenceRule::EqualityResolution,
                    vec![given],
                ));
            }
        }

        out
    }
}
