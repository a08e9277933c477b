//! Variable substitutions and reversible binders
//!
//! A `Substitution` maps variable indices to shared terms. Bindings are
//! triangular: a bound term may itself contain bound variables, which
//! `apply` resolves transitively while re-interning through the bank.
//!
//! A `Binder` is a reversible fragment: it records every variable bound
//! since its mark so the bindings can be rolled back in O(changes) or
//! committed (forgotten). Matchers only ever bind through a binder.

use super::literal::LiteralId;
use super::term::{TermBank, TermData, TermId};
use std::collections::HashMap;

/// A partial map from variable indices to shared terms.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    map: HashMap<u32, TermId>,
}

impl Substitution {
    pub fn new() -> Self {
        Substitution {
            map: HashMap::new(),
        }
    }

    /// Bind `var` to `term` unconditionally. Prefer binding through a
    /// `Binder` inside matchers.
    pub fn bind(&mut self, var: u32, term: TermId) {
        self.map.insert(var, term);
    }

    pub fn get(&self, var: u32) -> Option<TermId> {
        self.map.get(&var).copied()
    }

    pub fn contains(&self, var: u32) -> bool {
        self.map.contains_key(&var)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, TermId)> + '_ {
        self.map.iter().map(|(&v, &t)| (v, t))
    }

    fn remove(&mut self, var: u32) {
        self.map.remove(&var);
    }

    /// Apply the substitution to a term, resolving bindings transitively
    /// and re-interning the result.
    pub fn apply(&self, term: TermId, bank: &mut TermBank) -> TermId {
        if self.map.is_empty() || bank.vars(term) == 0 {
            return term;
        }
        match bank.term_data(term).clone() {
            TermData::Var(v) => match self.get(v) {
                // Triangular resolution: the binding may mention bound vars
                Some(bound) if bound != term => self.apply(bound, bank),
                _ => term,
            },
            TermData::App { functor, args } => {
                let new_args: Vec<TermId> = args.iter().map(|&a| self.apply(a, bank)).collect();
                if new_args == args {
                    term
                } else {
                    bank.app(functor, new_args)
                }
            }
        }
    }

    /// Apply the substitution to a literal.
    pub fn apply_literal(&self, lit: LiteralId, bank: &mut TermBank) -> LiteralId {
        let data = bank.literal_data(lit).clone();
        let args: Vec<TermId> = data.args.iter().map(|&a| self.apply(a, bank)).collect();
        if args == data.args {
            lit
        } else {
            bank.literal(data.predicate, data.polarity, args)
        }
    }

    /// Compose: the result maps every `v` of `self` to `other(self(v))` and
    /// includes the bindings of `other` not shadowed by `self`. Pure.
    pub fn compose(&self, other: &Substitution, bank: &mut TermBank) -> Substitution {
        let mut result = Substitution::new();
        for (&v, &t) in &self.map {
            result.bind(v, other.apply(t, bank));
        }
        for (&v, &t) in &other.map {
            if !self.map.contains_key(&v) {
                result.bind(v, t);
            }
        }
        result
    }
}

/// A reversible binding fragment over a substitution.
///
/// Records the variables bound since creation; `rollback` removes exactly
/// those, `commit` forgets the trail. Not re-entrant — one binder per
/// matching attempt.
#[derive(Debug, Default)]
pub struct Binder {
    trail: Vec<u32>,
}

impl Binder {
    pub fn new() -> Self {
        Binder { trail: Vec::new() }
    }

    /// Bind `var` through the binder, recording it on the trail.
    /// Returns false (and binds nothing) if `var` is already bound to a
    /// different term — matchers never widen existing bindings.
    pub fn bind(&mut self, subst: &mut Substitution, var: u32, term: TermId) -> bool {
        match subst.get(var) {
            Some(existing) => existing == term,
            None => {
                subst.bind(var, term);
                self.trail.push(var);
                true
            }
        }
    }

    /// Undo every binding recorded on the trail.
    pub fn rollback(&mut self, subst: &mut Substitution) {
        for var in self.trail.drain(..) {
            subst.remove(var);
        }
    }

    /// Keep the bindings and forget the trail.
    pub fn commit(&mut self) {
        self.trail.clear();
    }

    pub fn bound_count(&self) -> usize {
        self.trail.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_substitution() {
        let mut bank = TermBank::new();
        let f = bank.signature.add_plain_function("f", 1);
        let a = bank.signature.add_plain_function("a", 0);
        let x = bank.var(0);
        let ca = bank.constant(a);
        let fx = bank.app(f, vec![x]);

        let mut subst = Substitution::new();
        subst.bind(0, ca);

        let fa = bank.app(f, vec![ca]);
        assert_eq!(subst.apply(fx, &mut bank), fa);
        // Unbound variables are left alone
        let y = bank.var(1);
        assert_eq!(subst.apply(y, &mut bank), y);
    }

    #[test]
    fn test_triangular_resolution() {
        let mut bank = TermBank::new();
        let f = bank.signature.add_plain_function("f", 1);
        let a = bank.signature.add_plain_function("a", 0);
        let x = bank.var(0);
        let y = bank.var(1);
        let ca = bank.constant(a);
        let fy = bank.app(f, vec![y]);

        // X -> f(Y), Y -> a resolves X to f(a)
        let mut subst = Substitution::new();
        subst.bind(0, fy);
        subst.bind(1, ca);

        let fa = bank.app(f, vec![ca]);
        assert_eq!(subst.apply(x, &mut bank), fa);
    }

    #[test]
    fn test_compose() {
        let mut bank = TermBank::new();
        let f = bank.signature.add_plain_function("f", 1);
        let a = bank.signature.add_plain_function("a", 0);
        let y = bank.var(1);
        let ca = bank.constant(a);
        let fy = bank.app(f, vec![y]);

        let mut s1 = Substitution::new();
        s1.bind(0, fy);
        let mut s2 = Substitution::new();
        s2.bind(1, ca);

        let composed = s1.compose(&s2, &mut bank);
        let x = bank.var(0);
        let fa = bank.app(f, vec![ca]);
        assert_eq!(composed.apply(x, &mut bank), fa);
        assert_eq!(composed.apply(y, &mut bank), ca);
    }

    #[test]
    fn test_binder_rollback_and_commit() {
        let mut bank = TermBank::new();
        let a = bank.signature.add_plain_function("a", 0);
        let b = bank.signature.add_plain_function("b", 0);
        let ca = bank.constant(a);
        let cb = bank.constant(b);

        let mut subst = Substitution::new();
        subst.bind(9, cb);

        let mut binder = Binder::new();
        assert!(binder.bind(&mut subst, 0, ca));
        assert!(binder.bind(&mut subst, 1, cb));
        // Re-binding to the same term succeeds without growing the trail
        assert!(binder.bind(&mut subst, 0, ca));
        // Conflicting re-binding fails
        assert!(!binder.bind(&mut subst, 0, cb));
        assert_eq!(binder.bound_count(), 2);

        binder.rollback(&mut subst);
        assert!(!subst.contains(0));
        assert!(!subst.contains(1));
        // Pre-existing bindings survive rollback
        assert_eq!(subst.get(9), Some(cb));

        let mut binder = Binder::new();
        assert!(binder.bind(&mut subst, 2, ca));
        binder.commit();
        binder.rollback(&mut subst);
        assert_eq!(subst.get(2), Some(ca));
    }
}
