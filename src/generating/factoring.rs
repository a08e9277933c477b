//! Positive factoring
//!
//! From `A ∨ A' ∨ C` with σ = mgu(A, A'), derive `(A ∨ C)σ`. Both
//! factored literals must be selected and share header; equality literals
//! are handled by equality factoring.

use super::common::{normalize_clause_vars, remove_duplicate_literals};
use crate::fol::unify_args;
use crate::proof::InferenceRule;
use crate::saturation::rule::{Generated, GeneratingRule, RuleContext};

pub struct FactoringRule;

impl FactoringRule {
    pub fn new() -> Self {
        FactoringRule
    }
}

impl Default for FactoringRule {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratingRule for FactoringRule {
    fn name(&self) -> &'static str {
        "factoring"
    }

    fn generate(&mut self, given: usize, ctx: &mut RuleContext<'_>) -> Vec<Generated> {
        let clauses = ctx.clauses;
        let bank = &mut *ctx.bank;

        let clause = &clauses[given];
        let mut out = Vec::new();

        for i in 0..clause.selected {
            let li = clause.literals[i];
            if bank.is_equality(li) {
                continue;
            }
            for j in (i + 1)..clause.selected {
                let lj = clause.literals[j];
                if bank.literal_header(li) != bank.literal_header(lj) {
                    continue;
                }
                if let Some(sigma) = unify_args(li, lj, bank) {
                    let mut literals = Vec::with_capacity(clause.literals.len() - 1);
                    for (p, &l) in clause.literals.iter().enumerate() {
                        if p == j {
                            continue;
                        }
                        literals.push(sigma.apply_literal(l, bank));
                    }
                    let literals = remove_duplicate_literals(literals);
                    let literals = normalize_clause_vars(&literals, bank);
                    out.push(Generated::new(
                        literals,
                        InferenceRule::Factoring,
                        vec![given],
                    ));
                }
            }
        }

        out
    }
}
