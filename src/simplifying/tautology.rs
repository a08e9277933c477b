//! Tautology deletion
//!
//! A clause containing complementary literals or a reflexive positive
//! equality is valid and contributes nothing to the search.

use crate::saturation::rule::{RuleContext, Simplification, SimplifyingRule};

pub struct TautologyRule;

impl TautologyRule {
    pub fn new() -> Self {
        TautologyRule
    }
}

impl Default for TautologyRule {
    fn default() -> Self {
        Self::new()
    }
}

impl SimplifyingRule for TautologyRule {
    fn name(&self) -> &'static str {
        "tautology_deletion"
    }

    fn simplify_forward(
        &mut self,
        target: usize,
        ctx: &mut RuleContext<'_>,
    ) -> Option<Simplification> {
        let clause = ctx.clauses[target].clone();
        if clause.is_tautology(ctx.bank) {
            Some(Simplification::Delete {
                target,
                premises: vec![],
            })
        } else {
            None
        }
    }

    fn simplify_backward(
        &mut self,
        _activated: usize,
        _ctx: &mut RuleContext<'_>,
    ) -> Vec<Simplification> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::{Clause, ClauseRole, TermBank, KBO};
    use crate::index::SaturationIndexes;

    #[test]
    fn test_complementary_literals_deleted() {
        let mut bank = TermBank::new();
        let p = bank.signature.add_plain_predicate("p", 1);
        let a = bank.signature.add_plain_function("a", 0);
        let ca = bank.constant(a);
        let pos = bank.positive(p, vec![ca]);
        let neg = bank.negative(p, vec![ca]);

        let clauses = vec![
            Clause::input(vec![pos, neg], ClauseRole::Axiom, &bank),
            Clause::input(vec![pos], ClauseRole::Axiom, &bank),
        ];

        let indexes = SaturationIndexes::new();
        let kbo = KBO::default();
        let mut ctx = RuleContext {
            clauses: &clauses,
            indexes: &indexes,
            bank: &mut bank,
            kbo: &kbo,
            rename_offset: 10,
        };

        let mut rule = TautologyRule::new();
        assert!(matches!(
            rule.simplify_forward(0, &mut ctx),
            Some(Simplification::Delete { target: 0, .. })
        ));
        assert!(rule.simplify_forward(1, &mut ctx).is_none());
    }

    #[test]
    fn test_reflexive_equality_deleted() {
        let mut bank = TermBank::new();
        let a = bank.signature.add_plain_function("a", 0);
        let ca = bank.constant(a);
        let refl = bank.equality(true, ca, ca);

        let clauses = vec![Clause::input(vec![refl], ClauseRole::Axiom, &bank)];
        let indexes = SaturationIndexes::new();
        let kbo = KBO::default();
        let mut ctx = RuleContext {
            clauses: &clauses,
            indexes: &indexes,
            bank: &mut bank,
            kbo: &kbo,
            rename_offset: 10,
        };

        let mut rule = TautologyRule::new();
        assert!(rule.simplify_forward(0, &mut ctx).is_some());
    }
}
