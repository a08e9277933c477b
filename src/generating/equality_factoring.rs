//! Equality factoring
//!
//! From `l = r ∨ l' = r' ∨ C` with σ = mgu(l, l') and lσ not smaller than
//! rσ, derive `(r ≠ r' ∨ l' = r' ∨ C)σ`. Each equality is tried in both
//! orientations.

use super::common::{normalize_clause_vars, not_smaller, remove_duplicate_literals};
use crate::fol::unify;
use crate::proof::InferenceRule;
use crate::saturation::rule::{Generated, GeneratingRule, RuleContext};

pub struct EqualityFactoringRule;

impl EqualityFactoringRule {
    pub fn new() -> Self {
        EqualityFactoringRule
    }
}

impl Default for EqualityFactoringRule {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratingRule for EqualityFactoringRule {
    fn name(&self) -> &'static str {
        "equality_factoring"
    }

    fn generate(&mut self, given: usize, ctx: &mut RuleContext<'_>) -> Vec<Generated> {
        let clauses = ctx.clauses;
        let kbo = ctx.kbo;
        let bank = &mut *ctx.bank;

        let clause = &clauses[given];
        let mut out = Vec::new();

        for i in 0..clause.selected {
            let li = clause.literals[i];
            if !bank.literal_polarity(li) || !bank.is_equality(li) {
                continue;
            }
            for j in 0..clause.selected {
                if i == j {
                    continue;
                }
                let lj = clause.literals[j];
                if !bank.literal_polarity(lj) || !bank.is_equality(lj) {
                    continue;
                }
                let iargs: [crate::fol::TermId; 2] = [
                    bank.literal_args(li)[0],
                    bank.literal_args(li)[1],
                ];
                let jargs: [crate::fol::TermId; 2] = [
                    bank.literal_args(lj)[0],
                    bank.literal_args(lj)[1],
                ];
                for (l, r) in [(iargs[0], iargs[1]), (iargs[1], iargs[0])] {
                    for (lp, rp) in [(jargs[0], jargs[1]), (jargs[1], jargs[0])] {
                        let sigma = match unify(l, lp, bank) {
                            Some(s) => s,
                            None => continue,
                        };
                        let l_sigma = sigma.apply(l, bank);
                        let r_sigma = sigma.apply(r, bank);
                        if !not_smaller(l_sigma, r_sigma, kbo, bank) {
                            continue;
                        }

                        let rp_sigma = sigma.apply(rp, bank);
                        let mut literals = vec![bank.equality(false, r_sigma, rp_sigma)];
                        let lp_sigma = sigma.apply(lp, bank);
                        literals.push(bank.equality(true, lp_sigma, rp_sigma));
                        for (p, &other) in clause.literals.iter().enumerate() {
                            if p == i || p == j {
                                continue;
                            }
                            literals.push(sigma.apply_literal(other, bank));
                        }

                        let literals = remove_duplicate_literals(literals);
                        let literals = normalize_clause_vars(&literals, bank);
                        out.push(Generated::new(
                            literals,
                            InferenceRule::EqualityFactoring,
                            vec![given],
                        ));
                    }
                }
            }
        }

        out
    }
}
