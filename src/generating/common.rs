//! Shared helpers for the generating rules

use crate::fol::{LiteralId, Substitution, TermBank, TermData, TermId, TermOrdering, KBO};

/// Apply σ to every literal of a clause except the excluded positions.
pub fn collect_literals_except(
    literals: &[LiteralId],
    exclude: &[usize],
    subst: &Substitution,
    bank: &mut TermBank,
) -> Vec<LiteralId> {
    literals
        .iter()
        .enumerate()
        .filter(|(pos, _)| !exclude.contains(pos))
        .map(|(_, &lit)| subst.apply_literal(lit, bank))
        .collect()
}

/// Drop duplicate literals, keeping first occurrences.
pub fn remove_duplicate_literals(literals: Vec<LiteralId>) -> Vec<LiteralId> {
    let mut seen = Vec::with_capacity(literals.len());
    for lit in literals {
        if !seen.contains(&lit) {
            seen.push(lit);
        }
    }
    seen
}

/// Renumber clause variables from zero in order of first occurrence.
/// Conclusions built from offset-renamed premises would otherwise keep
/// climbing variable indices forever.
pub fn normalize_clause_vars(literals: &[LiteralId], bank: &mut TermBank) -> Vec<LiteralId> {
    let mut mapping: Vec<u32> = Vec::new();
    let mut subst = Substitution::new();
    for &lit in literals {
        let mut vars = Vec::new();
        bank.literal_collect_vars(lit, &mut vars);
        for v in vars {
            if !mapping.contains(&v) {
                let fresh = bank.var(mapping.len() as u32);
                mapping.push(v);
                subst.bind(v, fresh);
            }
        }
    }
    if mapping.iter().enumerate().all(|(i, &v)| i as u32 == v) {
        return literals.to_vec();
    }
    literals
        .iter()
        .map(|&lit| subst.apply_literal(lit, bank))
        .collect()
}

/// Ordering constraint for superposition and factoring: the candidate side
/// must not be smaller than the other (Greater or Incomparable).
pub fn not_smaller(t1: TermId, t2: TermId, kbo: &KBO, bank: &TermBank) -> bool {
    matches!(
        kbo.compare(t1, t2, bank),
        TermOrdering::Greater | TermOrdering::Incomparable
    )
}

/// All non-variable subterm positions of a term, preorder, as
/// (subterm, path) pairs.
pub fn nonvar_positions(term: TermId, bank: &TermBank) -> Vec<(TermId, Vec<usize>)> {
    let mut out = Vec::new();
    fn rec(t: TermId, path: &mut Vec<usize>, bank: &TermBank, out: &mut Vec<(TermId, Vec<usize>)>) {
        match bank.term_data(t) {
            TermData::Var(_) => {}
            TermData::App { args, .. } => {
                out.push((t, path.clone()));
                for (i, &arg) in args.iter().enumerate() {
                    path.push(i);
                    rec(arg, path, bank, out);
                    path.pop();
                }
            }
        }
    }
    rec(term, &mut Vec::new(), bank, &mut out);
    out
}

/// Replace the subterm at `path` inside `term` with `replacement`.
pub fn replace_at_path(
    term: TermId,
    path: &[usize],
    replacement: TermId,
    bank: &mut TermBank,
) -> TermId {
    if path.is_empty() {
        return replacement;
    }
    match bank.term_data(term).clone() {
        TermData::Var(_) => term,
        TermData::App { functor, args } => {
            let mut new_args = args.clone();
            new_args[path[0]] = replace_at_path(args[path[0]], &path[1..], replacement, bank);
            bank.app(functor, new_args)
        }
    }
}
