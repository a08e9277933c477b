//! Induction hypothesis assembly
//!
//! A scheme turns into the formula `(∧ cases) → conclusion`, where each
//! case is `∀(conditions ∧ ∧ hypotheses → step)` and the conclusion
//! replaces every induction term with a fresh universally quantified
//! variable. The formula is clausified and the resulting clauses are
//! resolved against the triggering literal, producing the induction's
//! forward inferences.

use super::scheme::InductionScheme;
use crate::fol::{Clausifier, ClauseRole, Formula, LiteralId, TermBank, TermId};
use std::collections::HashMap;

/// Replace term occurrences in a literal according to the map.
pub fn replace_in_literal(
    lit: LiteralId,
    map: &HashMap<TermId, TermId>,
    bank: &mut TermBank,
) -> LiteralId {
    let data = bank.literal_data(lit).clone();
    let mut args = data.args.clone();
    for arg in args.iter_mut() {
        for (&from, &to) in map {
            *arg = bank.replace(*arg, from, to);
        }
    }
    bank.literal(data.predicate, data.polarity, args)
}

/// Build the hypothesis formula of a scheme against the trigger literals.
///
/// `triggers` are the literals of the premise clause the induction targets
/// (one literal normally; several with multiclause induction). Internally
/// the construction works on their complements: the conclusion asserts
/// that some complemented trigger holds for every value.
pub fn hypothesis_formula(
    scheme: &InductionScheme,
    triggers: &[LiteralId],
    bank: &mut TermBank,
) -> Formula {
    let complements: Vec<LiteralId> = triggers
        .iter()
        .map(|&lit| bank.complement(lit))
        .collect();

    let mut case_formulas = Vec::with_capacity(scheme.cases.len());
    for case in &scheme.cases {
        let step = Formula::or(
            complements
                .iter()
                .map(|&m| Formula::lit(replace_in_literal(m, &case.step, bank)))
                .collect(),
        );

        let mut antecedent = case.conditions.clone();
        for rec in &case.recursive {
            antecedent.push(Formula::or(
                complements
                    .iter()
                    .map(|&m| Formula::lit(replace_in_literal(m, rec, bank)))
                    .collect(),
            ));
        }

        let body = if antecedent.is_empty() {
            step
        } else {
            Formula::implies(Formula::and(antecedent), step)
        };
        // Each case is closed on its own so that clausification
        // skolemizes its pattern variables per case
        let case_vars = body.free_vars(bank);
        let closed = if case_vars.is_empty() {
            body
        } else {
            Formula::Forall(case_vars, Box::new(body))
        };
        case_formulas.push(closed);
    }

    // Conclusion: each induction term becomes a fresh variable
    let mut fresh = scheme.max_var;
    let mut conclusion_map = HashMap::new();
    for &term in &scheme.terms {
        conclusion_map.insert(term, bank.var(fresh));
        fresh += 1;
    }
    let conclusion = Formula::or(
        complements
            .iter()
            .map(|&m| Formula::lit(replace_in_literal(m, &conclusion_map, bank)))
            .collect(),
    );

    Formula::implies(Formula::and(case_formulas), conclusion)
}

/// Clausify a hypothesis formula and resolve each resulting clause against
/// the trigger literal of the premise clause. Returns the conclusion
/// literal lists.
pub fn clausify_and_resolve(
    formula: Formula,
    trigger: LiteralId,
    premise_literals: &[LiteralId],
    clausifier: &mut Clausifier,
    bank: &mut TermBank,
) -> Vec<Vec<LiteralId>> {
    let clauses = clausifier.clausify(formula, ClauseRole::Derived, bank);
    let mut out = Vec::new();
    for clause in clauses {
        // Find the conclusion literal: complementary header, unifiable
        // arguments
        let mut resolved = None;
        for (pos, &lit) in clause.literals.iter().enumerate() {
            if bank.literal_predicate(lit) != bank.literal_predicate(trigger)
                || bank.literal_polarity(lit) == bank.literal_polarity(trigger)
            {
                continue;
            }
            if let Some(sigma) = crate::fol::unify_args(lit, trigger, bank) {
                resolved = Some((pos, sigma));
                break;
            }
        }
        let (pos, sigma) = match resolved {
            Some(r) => r,
            None => continue,
        };

        let mut literals: Vec<LiteralId> = Vec::new();
        for (p, &lit) in clause.literals.iter().enumerate() {
            if p == pos {
                continue;
            }
            literals.push(sigma.apply_literal(lit, bank));
        }
        for &side in premise_literals {
            if side == trigger {
                continue;
            }
            literals.push(sigma.apply_literal(side, bank));
        }
        literals.dedup();
        out.push(literals);
    }
    out
}

/// Canonical deduplication key of a scheme application: each induction
/// term is replaced by a per-sort blank constant in order of first
/// occurrence.
pub fn scheme_key(
    scheme: &InductionScheme,
    trigger: LiteralId,
    bank: &mut TermBank,
) -> (LiteralId, usize) {
    let mut map = HashMap::new();
    for (occurrence, &term) in scheme.terms.iter().enumerate() {
        let sort = match bank.functor(term) {
            Some(f) => bank.signature.function_result_sort(f),
            None => bank.signature.default_sort(),
        };
        let blank = bank.signature.blank_constant(sort, occurrence as u32);
        let blank_term = bank.constant(blank);
        map.insert(term, blank_term);
    }
    (replace_in_literal(trigger, &map, bank), scheme.cases.len())
}

/// Strengthening: replace the other inducible terms of the hypothesis
/// cases by fresh variables (non-recursive argument positions become
/// universally quantified in the case closure).
pub fn strengthen_case_maps(
    scheme: &mut InductionScheme,
    trigger: LiteralId,
    on_complex_terms: bool,
    bank: &mut TermBank,
) {
    let mut others = Vec::new();
    for &arg in bank.literal_args(trigger) {
        for sub in bank.subterms(arg) {
            if scheme.terms.contains(&sub) || others.contains(&sub) {
                continue;
            }
            if super::scheme::can_induct_on(sub, bank, on_complex_terms) {
                others.push(sub);
            }
        }
    }
    let mut fresh = scheme.max_var;
    for case in &mut scheme.cases {
        for &other in &others {
            let var = bank.var(fresh);
            fresh += 1;
            case.step.insert(other, var);
            for rec in &mut case.recursive {
                rec.insert(other, var);
            }
        }
    }
    scheme.max_var = fresh;
}
