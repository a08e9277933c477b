//! One-sided matching and two-sided unification
//!
//! Matching instantiates variables of the pattern only; the subject is
//! fixed. Matchers are deterministic, idempotent, and never widen an
//! existing binding (enforced by the `Binder`). Unification is full
//! two-sided with occurs check, producing a triangular substitution.

use super::literal::LiteralId;
use super::substitution::{Binder, Substitution};
use super::term::{TermBank, TermData, TermId};

/// Try to extend `subst` (through `binder`) so that `σ(pattern) = subject`.
/// Only variables of `pattern` are bound. On failure some bindings may
/// remain on the binder trail; the caller rolls back.
pub fn match_term(
    pattern: TermId,
    subject: TermId,
    subst: &mut Substitution,
    binder: &mut Binder,
    bank: &TermBank,
) -> bool {
    match bank.term_data(pattern) {
        TermData::Var(v) => binder.bind(subst, *v, subject),
        TermData::App { functor, args } => match bank.term_data(subject) {
            TermData::Var(_) => false,
            TermData::App {
                functor: sf,
                args: sargs,
            } => {
                if functor != sf || args.len() != sargs.len() {
                    return false;
                }
                args.iter()
                    .zip(sargs.iter())
                    .all(|(&p, &s)| match_term(p, s, subst, binder, bank))
            }
        },
    }
}

/// Match every argument of `pattern` against the same-position argument of
/// `subject`. Headers (predicate + polarity) must agree.
pub fn match_literal(
    pattern: LiteralId,
    subject: LiteralId,
    subst: &mut Substitution,
    binder: &mut Binder,
    bank: &TermBank,
) -> bool {
    if bank.literal_header(pattern) != bank.literal_header(subject) {
        return false;
    }
    let pargs = bank.literal_args(pattern);
    let sargs = bank.literal_args(subject);
    if pargs.len() != sargs.len() {
        return false;
    }
    pargs
        .iter()
        .zip(sargs.iter())
        .all(|(&p, &s)| match_term(p, s, subst, binder, bank))
}

/// Commutative variant for equality literals: match the pattern arguments
/// against the subject arguments swapped.
pub fn match_literal_reversed(
    pattern: LiteralId,
    subject: LiteralId,
    subst: &mut Substitution,
    binder: &mut Binder,
    bank: &TermBank,
) -> bool {
    if !bank.is_equality(pattern) || !bank.is_equality(subject) {
        return false;
    }
    if bank.literal_polarity(pattern) != bank.literal_polarity(subject) {
        return false;
    }
    let pargs = bank.literal_args(pattern);
    let sargs = bank.literal_args(subject);
    match_term(pargs[0], sargs[1], subst, binder, bank)
        && match_term(pargs[1], sargs[0], subst, binder, bank)
}

/// Standalone matching entry: returns the matching substitution if
/// `σ(pattern) = subject`.
pub fn try_match(pattern: TermId, subject: TermId, bank: &TermBank) -> Option<Substitution> {
    let mut subst = Substitution::new();
    let mut binder = Binder::new();
    if match_term(pattern, subject, &mut subst, &mut binder, bank) {
        binder.commit();
        Some(subst)
    } else {
        None
    }
}

/// Resolve a term through the substitution until it is not a bound variable.
fn walk(mut t: TermId, subst: &Substitution, bank: &TermBank) -> TermId {
    while let TermData::Var(v) = bank.term_data(t) {
        match subst.get(*v) {
            Some(bound) if bound != t => t = bound,
            _ => break,
        }
    }
    t
}

/// Occurs check modulo the current bindings.
fn occurs_resolved(v: u32, t: TermId, subst: &Substitution, bank: &TermBank) -> bool {
    let t = walk(t, subst, bank);
    match bank.term_data(t) {
        TermData::Var(w) => *w == v,
        TermData::App { args, .. } => args
            .iter()
            .any(|&arg| occurs_resolved(v, arg, subst, bank)),
    }
}

fn unify_rec(a: TermId, b: TermId, subst: &mut Substitution, bank: &TermBank) -> bool {
    let a = walk(a, subst, bank);
    let b = walk(b, subst, bank);
    if a == b {
        return true;
    }
    match (bank.term_data(a), bank.term_data(b)) {
        (TermData::Var(v), _) => {
            if occurs_resolved(*v, b, subst, bank) {
                return false;
            }
            subst.bind(*v, b);
            true
        }
        (_, TermData::Var(w)) => {
            if occurs_resolved(*w, a, subst, bank) {
                return false;
            }
            subst.bind(*w, a);
            true
        }
        (
            TermData::App { functor: f, args: fa },
            TermData::App { functor: g, args: ga },
        ) => {
            if f != g || fa.len() != ga.len() {
                return false;
            }
            fa.iter()
                .zip(ga.iter())
                .all(|(&x, &y)| unify_rec(x, y, subst, bank))
        }
    }
}

/// Most general unifier of two terms, with occurs check.
pub fn unify(a: TermId, b: TermId, bank: &TermBank) -> Option<Substitution> {
    let mut subst = Substitution::new();
    if unify_rec(a, b, &mut subst, bank) {
        Some(subst)
    } else {
        None
    }
}

/// Unify the argument lists of two literals with identical header
/// (polarity is the caller's concern; only predicate and args matter here).
pub fn unify_args(a: LiteralId, b: LiteralId, bank: &TermBank) -> Option<Substitution> {
    if bank.literal_predicate(a) != bank.literal_predicate(b) {
        return None;
    }
    let aargs = bank.literal_args(a);
    let bargs = bank.literal_args(b);
    if aargs.len() != bargs.len() {
        return None;
    }
    let mut subst = Substitution::new();
    for (&x, &y) in aargs.iter().zip(bargs.iter()) {
        if !unify_rec(x, y, &mut subst, bank) {
            return None;
        }
    }
    Some(subst)
}

/// Are the two terms equal up to a variable renaming?
pub fn are_variant_terms(a: TermId, b: TermId, bank: &TermBank) -> bool {
    fn rec(
        a: TermId,
        b: TermId,
        fwd: &mut std::collections::HashMap<u32, u32>,
        bwd: &mut std::collections::HashMap<u32, u32>,
        bank: &TermBank,
    ) -> bool {
        match (bank.term_data(a), bank.term_data(b)) {
            (TermData::Var(v), TermData::Var(w)) => {
                let ok_fwd = *fwd.entry(*v).or_insert(*w) == *w;
                let ok_bwd = *bwd.entry(*w).or_insert(*v) == *v;
                ok_fwd && ok_bwd
            }
            (
                TermData::App { functor: f, args: fa },
                TermData::App { functor: g, args: ga },
            ) => {
                f == g
                    && fa.len() == ga.len()
                    && fa
                        .iter()
                        .zip(ga.iter())
                        .all(|(&x, &y)| rec(x, y, fwd, bwd, bank))
            }
            _ => false,
        }
    }
    let mut fwd = std::collections::HashMap::new();
    let mut bwd = std::collections::HashMap::new();
    rec(a, b, &mut fwd, &mut bwd, bank)
}
