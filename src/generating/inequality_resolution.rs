//! Inequality resolution over linear integer arithmetic
//!
//! From `p > 0 ∨ C1` and `q > 0 ∨ C2` where p and q carry opposed
//! coefficients on a common monomial, derive
//! `(lcm/|c_p|)·p + (lcm/|c_q|)·q > 0 ∨ C1 ∨ C2` with the pivot monomial
//! cancelled. The rule fires on syntactically shared monomials (hash
//! consing makes equal monomials identical across clauses); coefficient
//! arithmetic is checked, and an overflowing combination is skipped and
//! counted instead of emitted.

use super::common::{normalize_clause_vars, remove_duplicate_literals};
use crate::arith::{
    greater_zero_literal, inequality_view, resolve_inequalities, IneqResolution, IneqView,
    MonomialBank,
};
use crate::proof::InferenceRule;
use crate::saturation::rule::{Generated, GeneratingRule, RuleContext};

#[derive(Default)]
pub struct InequalityResolutionRule {
    monomials: MonomialBank,
    overflow_skips: usize,
}

impl InequalityResolutionRule {
    pub fn new() -> Self {
        InequalityResolutionRule::default()
    }

    /// Inferences declined because a coefficient overflowed, since the
    /// last call.
    pub fn take_overflow_skips(&mut self) -> usize {
        std::mem::take(&mut self.overflow_skips)
    }
}

impl GeneratingRule for InequalityResolutionRule {
    fn name(&self) -> &'static str {
        "inequality_resolution"
    }

    fn record_statistics(&mut self, stats: &mut crate::statistics::Statistics) {
        stats.arith_overflow_skips += std::mem::take(&mut self.overflow_skips);
    }

    fn generate(&mut self, given: usize, ctx: &mut RuleContext<'_>) -> Vec<Generated> {
        let clauses = ctx.clauses;
        let indexes = ctx.indexes;
        let offset = ctx.rename_offset;
        let bank = &mut *ctx.bank;

        let given_clause = &clauses[given];
        let mut out = Vec::new();

        // Most general inequality pattern: every active `$greater` literal
        // is an instance
        let arith = bank.signature.interpret_arithmetic();
        let v0 = bank.var(offset);
        let v1 = bank.var(offset + 1);
        let pattern = bank.positive(arith.greater, vec![v0, v1]);

        for pos in 0..given_clause.selected {
            let lit = given_clause.literals[pos];
            let renamed = bank.literal_shift_vars(lit, offset);
            let p = match inequality_view(renamed, bank, &mut self.monomials) {
                IneqView::Greater(p) => p,
                IneqView::Overflow => {
                    self.overflow_skips += 1;
                    continue;
                }
                IneqView::NotArith => continue,
            };

            let partners = indexes.active_literals.literals.instances(pattern, bank);
            for (entry, _) in partners {
                let q = match inequality_view(entry.literal, bank, &mut self.monomials) {
                    IneqView::Greater(q) => q,
                    IneqView::Overflow => {
                        self.overflow_skips += 1;
                        continue;
                    }
                    IneqView::NotArith => continue,
                };

                let resolvent = match resolve_inequalities(&p, &q, &self.monomials) {
                    IneqResolution::Resolvent(r) => r,
                    IneqResolution::Overflow => {
                        self.overflow_skips += 1;
                        continue;
                    }
                    IneqResolution::NoOpposedMonomial => continue,
                };

                let partner = &clauses[entry.clause];
                let mut literals = vec![greater_zero_literal(&resolvent, bank, &self.monomials)];
                for (pp, &side) in given_clause.literals.iter().enumerate() {
                    if pp == pos {
                        continue;
                    }
                    literals.push(bank.literal_shift_vars(side, offset));
                }
                for (pp, &side) in partner.literals.iter().enumerate() {
                    if pp == entry.position {
                        continue;
                    }
                    literals.push(side);
                }

                let literals = remove_duplicate_literals(literals);
                let literals = normalize_clause_vars(&literals, bank);
                out.push(Generated::new(
                    literals,
                    InferenceRule::InequalityResolution,
                    vec![given, entry.clause],
                ));
            }
        }

        out
    }
}
