//! Superposition (left and right)
//!
//! From `l = r ∨ C1` and `L[u] ∨ C2` with σ = mgu(l, u), u not a
//! variable, lσ not smaller than rσ, derive `(L[r] ∨ C1 ∨ C2)σ`. When the
//! rewritten literal is itself an equality, the rewritten side must not be
//! smaller than the other side.
//!
//! The rule runs in both roles of the given clause: its positive
//! equalities against the subterm index of the active set, and its
//! subterms against the active equality-side index. The given clause is
//! renamed apart in both roles.

use super::common::{
    normalize_clause_vars, not_smaller, remove_duplicate_literals, replace_at_path,
};
use crate::fol::{LiteralId, Substitution, TermBank, TermId};
use crate::proof::InferenceRule;
use crate::saturation::rule::{Generated, GeneratingRule, RuleContext};

pub struct SuperpositionRule;

impl SuperpositionRule {
    pub fn new() -> Self {
        SuperpositionRule
    }
}

impl Default for SuperpositionRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-variable subterm occurrences of a literal:
/// (subterm, argument index, path inside the argument).
fn literal_positions(lit: LiteralId, bank: &TermBank) -> Vec<(TermId, usize, Vec<usize>)> {
    let mut out = Vec::new();
    for (arg_idx, &arg) in bank.literal_args(lit).iter().enumerate() {
        for (sub, path) in super::common::nonvar_positions(arg, bank) {
            out.push((sub, arg_idx, path));
        }
    }
    out
}

/// Rewrite one argument position of a literal to `replacement`, then apply
/// σ to the whole literal.
fn rewrite_literal(
    lit: LiteralId,
    arg_idx: usize,
    path: &[usize],
    replacement: TermId,
    sigma: &Substitution,
    bank: &mut TermBank,
) -> LiteralId {
    let data = bank.literal_data(lit).clone();
    let mut args = data.args.clone();
    args[arg_idx] = replace_at_path(args[arg_idx], path, replacement, bank);
    let rewritten = bank.literal(data.predicate, data.polarity, args);
    sigma.apply_literal(rewritten, bank)
}

/// Ordering constraint on a rewritten equality: the side holding the
/// redex must not be smaller than the other side after σ.
fn equality_side_ok(
    lit: LiteralId,
    arg_idx: usize,
    sigma: &Substitution,
    ctx_kbo: &crate::fol::KBO,
    bank: &mut TermBank,
) -> bool {
    if !bank.is_equality(lit) {
        return true;
    }
    let args = bank.literal_args(lit).to_vec();
    let this = sigma.apply(args[arg_idx], bank);
    let other = sigma.apply(args[1 - arg_idx], bank);
    not_smaller(this, other, ctx_kbo, bank)
}

impl GeneratingRule for SuperpositionRule {
    fn name(&self) -> &'static str {
        "superposition"
    }

    fn generate(&mut self, given: usize, ctx: &mut RuleContext<'_>) -> Vec<Generated> {
        let clauses = ctx.clauses;
        let indexes = ctx.indexes;
        let kbo = ctx.kbo;
        let offset = ctx.rename_offset;
        let bank = &mut *ctx.bank;

        let given_clause = &clauses[given];
        let mut out = Vec::new();

        // Role 1: the given clause's positive equalities rewrite into the
        // active set (given renamed apart)
        for pos in 0..given_clause.selected {
            let lit = given_clause.literals[pos];
            if !bank.literal_polarity(lit) || !bank.is_equality(lit) {
                continue;
            }
            let renamed = bank.literal_shift_vars(lit, offset);
            let args = bank.literal_args(renamed).to_vec();
            for (l, r) in [(args[0], args[1]), (args[1], args[0])] {
                if bank.is_var(l) {
                    continue;
                }
                let partners = indexes.subterms.terms.unifications(l, bank);
                for (entry, sigma) in partners {
                    let l_sigma = sigma.apply(l, bank);
                    let r_sigma = sigma.apply(r, bank);
                    if !not_smaller(l_sigma, r_sigma, kbo, bank) {
                        continue;
                    }
                    let target = &clauses[entry.clause];
                    let target_lit = target.literals[entry.literal];
                    // The index stores the subterm, not its occurrence;
                    // rewrite each occurrence separately
                    for (sub, arg_idx, path) in literal_positions(target_lit, bank) {
                        if sub != entry.term {
                            continue;
                        }
                        if !equality_side_ok(target_lit, arg_idx, &sigma, kbo, bank) {
                            continue;
                        }

                        let mut literals = Vec::new();
                        for (p, &side) in given_clause.literals.iter().enumerate() {
                            if p == pos {
                                continue;
                            }
                            let shifted = bank.literal_shift_vars(side, offset);
                            literals.push(sigma.apply_literal(shifted, bank));
                        }
                        literals.push(rewrite_literal(
                            target_lit, arg_idx, &path, r, &sigma, bank,
                        ));
                        for (p, &side) in target.literals.iter().enumerate() {
                            if p == entry.literal {
                                continue;
                            }
                            literals.push(sigma.apply_literal(side, bank));
                        }

                        let literals = remove_duplicate_literals(literals);
                        let literals = normalize_clause_vars(&literals, bank);
                        let mut generated = Generated::new(
                            literals,
                            InferenceRule::Superposition,
                            vec![given, entry.clause],
                        );
                        generated.rewrite = Some((l_sigma, sigma.apply(r, bank)));
                        out.push(generated);
                    }
                }
            }
        }

        // Role 2: active equalities rewrite into the given clause
        // (given renamed apart)
        for pos in 0..given_clause.selected {
            let lit = given_clause.literals[pos];
            let renamed = bank.literal_shift_vars(lit, offset);
            for (u, arg_idx, path) in literal_positions(renamed, bank) {
                let partners = indexes.equality_lhs.terms.unifications(u, bank);
                for (entry, sigma) in partners {
                    let from = &clauses[entry.clause];
                    let from_lit = from.literals[entry.literal];
                    // Self-pairing of the same redex is covered by role 1
                    if entry.clause == given {
                        continue;
                    }
                    let eq_args = bank.literal_args(from_lit).to_vec();
                    let (l, r) = if eq_args[0] == entry.term {
                        (eq_args[0], eq_args[1])
                    } else {
                        (eq_args[1], eq_args[0])
                    };
                    let l_sigma = sigma.apply(l, bank);
                    let r_sigma = sigma.apply(r, bank);
                    if !not_smaller(l_sigma, r_sigma, kbo, bank) {
                        continue;
                    }
                    if !equality_side_ok(renamed, arg_idx, &sigma, kbo, bank) {
                        continue;
                    }

                    let mut literals = Vec::new();
                    for (p, &side) in from.literals.iter().enumerate() {
                        if p == entry.literal {
                            continue;
                        }
                        literals.push(sigma.apply_literal(side, bank));
                    }
                    literals.push(rewrite_literal(renamed, arg_idx, &path, r, &sigma, bank));
                    for (p, &side) in given_clause.literals.iter().enumerate() {
                        if p == pos {
                            continue;
                        }
                        let shifted = bank.literal_shift_vars(side, offset);
                        literals.push(sigma.apply_literal(shifted, bank));
                    }

                    let literals = remove_duplicate_literals(literals);
                    let literals = normalize_clause_vars(&literals, bank);
                    let mut generated = Generated::new(
                        literals,
                        InferenceRule::Superposition,
                        vec![entry.clause, given],
                    );
                    generated.rewrite = Some((l_sigma, r_sigma));
                    out.push(generated);
                }
            }
        }

        out
    }
}
