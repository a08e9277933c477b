//! Demodulation: rewriting with oriented unit equalities
//!
//! A unit clause `l = r` rewrites a subterm `u = σ(l)` of another clause
//! to `σ(r)` whenever `σ(l) ≻ σ(r)` in the simplification ordering.
//! Forward demodulation normalizes the clause entering the search against
//! the active demodulators; backward demodulation rewrites stored clauses
//! when a new unit equality is activated.

use crate::fol::{try_match, LiteralId, TermBank, TermData, TermId, TermOrdering, KBO};
use crate::proof::InferenceRule;
use crate::saturation::rule::{RuleContext, Simplification, SimplifyingRule};

/// Rewrite every `l`-instance subterm of the literals whose instance is
/// strictly greater than the corresponding `r`-instance. Returns the new
/// literals and one performed rewrite for the derivation record.
fn demodulate_literals(
    literals: &[LiteralId],
    l: TermId,
    r: TermId,
    kbo: &KBO,
    bank: &mut TermBank,
) -> Option<(Vec<LiteralId>, (TermId, TermId))> {
    let mut rewrite: Option<(TermId, TermId)> = None;
    let mut changed = false;
    let mut new_literals = Vec::with_capacity(literals.len());
    for &lit in literals {
        let data = bank.literal_data(lit).clone();
        let mut args = data.args.clone();
        for arg in args.iter_mut() {
            *arg = rewrite_term(*arg, l, r, kbo, bank, &mut rewrite);
        }
        if args != data.args {
            changed = true;
            new_literals.push(bank.literal(data.predicate, data.polarity, args));
        } else {
            new_literals.push(lit);
        }
    }
    if changed {
        Some((new_literals, rewrite.expect("changed literals record a rewrite")))
    } else {
        None
    }
}

fn rewrite_term(
    term: TermId,
    l: TermId,
    r: TermId,
    kbo: &KBO,
    bank: &mut TermBank,
    rewrite: &mut Option<(TermId, TermId)>,
) -> TermId {
    if let Some(sigma) = try_match(l, term, bank) {
        let r_instance = sigma.apply(r, bank);
        // The rewrite must be strictly decreasing at this instance
        if kbo.compare(term, r_instance, bank) == TermOrdering::Greater {
            if rewrite.is_none() {
                *rewrite = Some((term, r_instance));
            }
            return r_instance;
        }
    }
    match bank.term_data(term).clone() {
        TermData::Var(_) => term,
        TermData::App { functor, args } => {
            let new_args: Vec<TermId> = args
                .iter()
                .map(|&arg| rewrite_term(arg, l, r, kbo, bank, rewrite))
                .collect();
            if new_args == args {
                term
            } else {
                bank.app(functor, new_args)
            }
        }
    }
}

/// The two sides of a unit positive equality clause, if it is one.
fn unit_equality_sides(
    clause: &crate::fol::Clause,
    bank: &TermBank,
) -> Option<(TermId, TermId)> {
    if clause.literals.len() != 1 {
        return None;
    }
    let lit = clause.literals[0];
    if !bank.literal_polarity(lit) || !bank.is_equality(lit) {
        return None;
    }
    let args = bank.literal_args(lit);
    Some((args[0], args[1]))
}

pub struct DemodulationRule;

impl DemodulationRule {
    pub fn new() -> Self {
        DemodulationRule
    }
}

impl Default for DemodulationRule {
    fn default() -> Self {
        Self::new()
    }
}

impl SimplifyingRule for DemodulationRule {
    fn name(&self) -> &'static str {
        "demodulation"
    }

    fn simplify_forward(
        &mut self,
        target: usize,
        ctx: &mut RuleContext<'_>,
    ) -> Option<Simplification> {
        let clauses = ctx.clauses;
        let indexes = ctx.indexes;
        let kbo = ctx.kbo;
        let bank = &mut *ctx.bank;

        let literals = clauses[target].literals.clone();
        for unit_idx in indexes.unit_equalities.iter() {
            if unit_idx == target {
                continue;
            }
            let (a, b) = match unit_equality_sides(&clauses[unit_idx], bank) {
                Some(sides) => sides,
                None => continue,
            };
            // Try both orientations; the per-instance ordering check keeps
            // only decreasing rewrites
            for (l, r) in [(a, b), (b, a)] {
                if let Some((new_literals, rewrite)) =
                    demodulate_literals(&literals, l, r, kbo, bank)
                {
                    return Some(Simplification::Replace {
                        target,
                        literals: new_literals,
                        rule: InferenceRule::Demodulation,
                        premises: vec![target, unit_idx],
                        rewrite: Some(rewrite),
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
        let kbo = ctx.kbo;
        let bank = &mut *ctx.bank;

        let (a, b) = match unit_equality_sides(&clauses[activated], bank) {
            Some(sides) => sides,
            None => return Vec::new(),
        };

        let mut out = Vec::new();
        let mut touched = Vec::new();
        for (l, r) in [(a, b), (b, a)] {
            if bank.is_var(l) {
                continue;
            }
            // Stored subterms that are instances of l are rewrite
            // candidates
            for (entry, _) in indexes.subterms.terms.instances(l, bank) {
                if entry.clause == activated || touched.contains(&entry.clause) {
                    continue;
                }
                let literals = clauses[entry.clause].literals.clone();
                if let Some((new_literals, rewrite)) =
                    demodulate_literals(&literals, l, r, kbo, bank)
                {
                    touched.push(entry.clause);
                    out.push(Simplification::Replace {
                        target: entry.clause,
                        literals: new_literals,
                        rule: InferenceRule::Demodulation,
                        premises: vec![entry.clause, activated],
                        rewrite: Some(rewrite),
                    });
                }
            }
        }
        out
    }
}
