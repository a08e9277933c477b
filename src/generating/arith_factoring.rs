//! Literal factoring over arithmetic inequalities
//!
//! Two `p > 0` literals of one clause collapse into one when their
//! polynomials are equal up to a positive rational factor: cross-scaling
//! by the leading coefficients makes them identical. The conclusion keeps
//! the first literal and drops the second. All scalings are checked; an
//! overflowing comparison skips the inference and is counted.

use super::common::{normalize_clause_vars, remove_duplicate_literals};
use crate::arith::{inequality_view, IneqView, MonomialBank};
use crate::proof::InferenceRule;
use crate::saturation::rule::{Generated, GeneratingRule, RuleContext};

#[derive(Default)]
pub struct ArithFactoringRule {
    monomials: MonomialBank,
    overflow_skips: usize,
}

impl ArithFactoringRule {
    pub fn new() -> Self {
        ArithFactoringRule::default()
    }

    /// Inferences declined because a coefficient overflowed, since the
    /// last call.
    pub fn take_overflow_skips(&mut self) -> usize {
        std::mem::take(&mut self.overflow_skips)
    }
}

impl GeneratingRule for ArithFactoringRule {
    fn name(&self) -> &'static str {
        "arithmetic_factoring"
    }

    fn record_statistics(&mut self, stats: &mut crate::statistics::Statistics) {
        stats.arith_overflow_skips += std::mem::take(&mut self.overflow_skips);
    }

    fn generate(&mut self, given: usize, ctx: &mut RuleContext<'_>) -> Vec<Generated> {
        let clauses = ctx.clauses;
        let bank = &mut *ctx.bank;

        let clause = &clauses[given];
        let mut out = Vec::new();

        for i in 0..clause.selected {
            let li = clause.literals[i];
            let p = match inequality_view(li, bank, &mut self.monomials) {
                IneqView::Greater(p) => p,
                IneqView::Overflow => {
                    self.overflow_skips += 1;
                    continue;
                }
                IneqView::NotArith => continue,
            };
            let p_lead = match p.leading(&self.monomials) {
                Some(lead) => lead,
                None => continue,
            };

            for j in (i + 1)..clause.selected {
                let lj = clause.literals[j];
                let q = match inequality_view(lj, bank, &mut self.monomials) {
                    IneqView::Greater(q) => q,
                    IneqView::Overflow => {
                        self.overflow_skips += 1;
                        continue;
                    }
                    IneqView::NotArith => continue,
                };
                let q_lead = match q.leading(&self.monomials) {
                    Some(lead) => lead,
                    None => continue,
                };
                if p_lead.1 != q_lead.1 || (p_lead.0 > 0) != (q_lead.0 > 0) {
                    continue;
                }

                // p and q are proportional iff |c_q|·p == |c_p|·q
                let p_scaled = match p.scale(q_lead.0.abs()) {
                    Some(s) => s,
                    None => {
                        self.overflow_skips += 1;
                        continue;
                    }
                };
                let q_scaled = match q.scale(p_lead.0.abs()) {
                    Some(s) => s,
                    None => {
                        self.overflow_skips += 1;
                        continue;
                    }
                };
                if p_scaled != q_scaled {
                    continue;
                }

                let mut literals = Vec::with_capacity(clause.literals.len() - 1);
                for (pos, &l) in clause.literals.iter().enumerate() {
                    if pos == j {
                        continue;
                    }
                    literals.push(l);
                }
                let literals = remove_duplicate_literals(literals);
                let literals = normalize_clause_vars(&literals, bank);
                out.push(Generated::new(
                    literals,
                    InferenceRule::ArithmeticFactoring,
                    vec![given],
                ));
            }
        }

        out
    }
}
