//! Binary resolution
//!
//! From `A ∨ C1` and `~B ∨ C2` with σ = mgu(A, B), derive `(C1 ∨ C2)σ`.
//! Partners come from the selected-literal index, so only selected
//! literals of active clauses participate; the given clause is renamed
//! apart before unification. Equality literals are the business of the
//! equality rules and are skipped here.

use super::common::{collect_literals_except, normalize_clause_vars, remove_duplicate_literals};
use crate::proof::InferenceRule;
use crate::saturation::rule::{Generated, GeneratingRule, RuleContext};

pub struct ResolutionRule;

impl ResolutionRule {
    pub fn new() -> Self {
        ResolutionRule
    }
}

impl Default for ResolutionRule {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratingRule for ResolutionRule {
    fn name(&self) -> &'static str {
        "resolution"
    }

    fn generate(&mut self, given: usize, ctx: &mut RuleContext<'_>) -> Vec<Generated> {
        let clauses = ctx.clauses;
        let indexes = ctx.indexes;
        let offset = ctx.rename_offset;
        let bank = &mut *ctx.bank;

        let given_clause = &clauses[given];
        let mut out = Vec::new();

        for pos in 0..given_clause.selected {
            let lit = given_clause.literals[pos];
            if bank.is_equality(lit) {
                continue;
            }
            let renamed = bank.literal_shift_vars(lit, offset);
            let partners = indexes
                .selected
                .literals
                .complementary_unifications(renamed, bank);

            for (entry, sigma) in partners {
                let partner = &clauses[entry.clause];

                let mut literals = Vec::new();
                for (p, &l) in given_clause.literals.iter().enumerate() {
                    if p == pos {
                        continue;
                    }
                    let shifted = bank.literal_shift_vars(l, offset);
                    literals.push(sigma.apply_literal(shifted, bank));
                }
                literals.extend(collect_literals_except(
                    &partner.literals,
                    &[entry.position],
                    &sigma,
                    bank,
                ));

                let literals = remove_duplicate_literals(literals);
                let literals = normalize_clause_vars(&literals, bank);
                out.push(Generated::new(
                    literals,
                    InferenceRule::Resolution,
                    vec![given, entry.clause],
                ));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::{Clause, ClauseRole, TermBank, KBO};
    use crate::index::SaturationIndexes;

    #[test]
    fn test_unit_resolution_derives_empty_clause() {
        let mut bank = TermBank::new();
        let p = bank.signature.add_plain_predicate("p", 1);
        let a = bank.signature.add_plain_function("a", 0);
        let ca = bank.constant(a);
        let pa = bank.positive(p, vec![ca]);
        let npa = bank.negative(p, vec![ca]);

        let clauses = vec![
            Clause::input(vec![pa], ClauseRole::Axiom, &bank),
            Clause::input(vec![npa], ClauseRole::NegatedConjecture, &bank),
        ];

        let mut indexes = SaturationIndexes::new();
        indexes.on_activated(0, &clauses[0], &bank);
        indexes.on_activated(1, &clauses[1], &bank);

        let kbo = KBO::default();
        let mut ctx = RuleContext {
            clauses: &clauses,
            indexes: &indexes,
            bank: &mut bank,
            kbo: &kbo,
            rename_offset: 10,
        };

        let mut rule = ResolutionRule::new();
        let results = rule.generate(1, &mut ctx);
        assert_eq!(results.len(), 1);
        assert!(results[0].literals.is_empty());
        assert_eq!(results[0].premises, vec![1, 0]);
    }

    #[test]
    fn test_resolution_with_side_literals() {
        let mut bank = TermBank::new();
        let p = bank.signature.add_plain_predicate("p", 1);
        let q = bank.signature.add_plain_predicate("q", 1);
        let r = bank.signature.add_plain_predicate("r", 1);
        let a = bank.signature.add_plain_function("a", 0);
        let b = bank.signature.add_plain_function("b", 0);
        let ca = bank.constant(a);
        let cb = bank.constant(b);
        let x = bank.var(0);

        // p(a) | q(X)   and   ~p(a) | r(b)
        let pa = bank.positive(p, vec![ca]);
        let qx = bank.positive(q, vec![x]);
        let npa = bank.negative(p, vec![ca]);
        let rb = bank.positive(r, vec![cb]);

        let clauses = vec![
            Clause::input(vec![pa, qx], ClauseRole::Axiom, &bank),
            Clause::input(vec![npa, rb], ClauseRole::Axiom, &bank),
        ];

        let mut indexes = SaturationIndexes::new();
        indexes.on_activated(0, &clauses[0], &bank);
        indexes.on_activated(1, &clauses[1], &bank);

        let kbo = KBO::default();
        let mut ctx = RuleContext {
            clauses: &clauses,
            indexes: &indexes,
            bank: &mut bank,
            kbo: &kbo,
            rename_offset: 10,
        };

        let mut rule = ResolutionRule::new();
        let results = rule.generate(0, &mut ctx);
        assert_eq!(results.len(), 1);
        // Conclusion: q(X) | r(b)
        assert_eq!(results[0].literals.len(), 2);
        let lits = &results[0].literals;
        let x0 = ctx.bank.var(0);
        let expected_q = ctx.bank.positive(q, vec![x0]);
        assert!(lits.contains(&expected_q));
        assert!(lits.contains(&rb));
    }

    #[test]
    fn test_unifier_applied_to_sides() {
        let mut bank = TermBank::new();
        let p = bank.signature.add_plain_predicate("p", 1);
        let q = bank.signature.add_plain_predicate("q", 1);
        let a = bank.signature.add_plain_function("a", 0);
        let ca = bank.constant(a);
        let x = bank.var(0);

        // ~p(X) | q(X)   resolved with   p(a)
        let npx = bank.negative(p, vec![x]);
        let qx = bank.positive(q, vec![x]);
        let pa = bank.positive(p, vec![ca]);

        let clauses = vec![
            Clause::input(vec![npx, qx], ClauseRole::Axiom, &bank),
            Clause::input(vec![pa], ClauseRole::Axiom, &bank),
        ];

        let mut indexes = SaturationIndexes::new();
        indexes.on_activated(0, &clauses[0], &bank);
        indexes.on_activated(1, &clauses[1], &bank);

        let kbo = KBO::default();
        let mut ctx = RuleContext {
            clauses: &clauses,
            indexes: &indexes,
            bank: &mut bank,
            kbo: &kbo,
            rename_offset: 10,
        };

        let mut rule = ResolutionRule::new();
        let results = rule.generate(1, &mut ctx);
        assert_eq!(results.len(), 1);
        // Conclusion: q(a)
        let qa = ctx.bank.positive(q, vec![ca]);
        assert_eq!(results[0].literals, vec![qa]);
    }
}
