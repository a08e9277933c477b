//! Arithmetic normalization and inequality support
//!
//! Bridges interpreted literals (`$greater`, `$less`) and the canonical
//! polynomial form, and implements the coefficient arithmetic behind
//! inequality resolution. Every step is overflow-guarded: a step that
//! cannot be performed exactly is declined, never approximated.

pub mod polynomial;

pub use polynomial::{
    checked_lcm, normalize, Coeff, MonomialBank, MonomialData, MonomialId, Polynomial,
};

use crate::fol::{ArithPredicate, LiteralId, TermBank, TermId};

/// Outcome of viewing a literal as a normalized strict inequality `p > 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IneqView {
    /// Not a positive interpreted inequality
    NotArith,
    /// Normalization overflowed; the consulting inference must skip
    Overflow,
    /// The literal normalizes to `p > 0`
    Greater(Polynomial),
}

/// Normalize a positive `$greater(s, t)` / `$less(t, s)` literal into
/// `s - t > 0` canonical form.
pub fn inequality_view(lit: LiteralId, bank: &TermBank, monomials: &mut MonomialBank) -> IneqView {
    if !bank.literal_polarity(lit) {
        return IneqView::NotArith;
    }
    let pred = bank.literal_predicate(lit);
    let (lhs, rhs) = match bank.signature.arith_predicate(pred) {
        Some(ArithPredicate::Greater) => {
            let args = bank.literal_args(lit);
            (args[0], args[1])
        }
        Some(ArithPredicate::Less) => {
            let args = bank.literal_args(lit);
            (args[1], args[0])
        }
        None => return IneqView::NotArith,
    };
    let left = match normalize(lhs, bank, monomials) {
        Some(p) => p,
        None => return IneqView::Overflow,
    };
    let right = match normalize(rhs, bank, monomials) {
        Some(p) => p,
        None => return IneqView::Overflow,
    };
    let negated = match right.negate() {
        Some(p) => p,
        None => return IneqView::Overflow,
    };
    match left.add(&negated) {
        Some(p) => IneqView::Greater(p),
        None => IneqView::Overflow,
    }
}

/// Outcome of resolving two `> 0` polynomials on a common monomial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IneqResolution {
    /// No common monomial with opposed coefficient signs
    NoOpposedMonomial,
    /// The required scaling overflowed; the inference is skipped
    Overflow,
    /// The resolvent polynomial (`> 0`)
    Resolvent(Polynomial),
}

/// Given `p > 0` and `q > 0` with opposed leading coefficients on a common
/// monomial, clear that monomial using the LCM of the coefficients:
/// `(lcm/|c_p|)·p + (lcm/|c_q|)·q > 0`.
pub fn resolve_inequalities(
    p: &Polynomial,
    q: &Polynomial,
    monomials: &MonomialBank,
) -> IneqResolution {
    // Find a shared non-unit monomial with opposed signs
    let mut pivot: Option<(MonomialId, Coeff, Coeff)> = None;
    for &(cp, m) in &p.terms {
        if monomials.data(m).is_unit() {
            continue;
        }
        let cq = q.coefficient(m);
        if cq != 0 && (cp > 0) != (cq > 0) {
            pivot = Some((m, cp, cq));
            break;
        }
    }
    let (_, cp, cq) = match pivot {
        Some(found) => found,
        None => return IneqResolution::NoOpposedMonomial,
    };

    let lcm = match checked_lcm(cp, cq) {
        Some(l) => l,
        None => return IneqResolution::Overflow,
    };
    let p_scaled = match p.scale(lcm / cp.abs()) {
        Some(s) => s,
        None => return IneqResolution::Overflow,
    };
    let q_scaled = match q.scale(lcm / cq.abs()) {
        Some(s) => s,
        None => return IneqResolution::Overflow,
    };
    match p_scaled.add(&q_scaled) {
        Some(resolvent) => IneqResolution::Resolvent(resolvent),
        None => IneqResolution::Overflow,
    }
}

/// Rebuild a term from a canonical polynomial (for conclusion literals).
pub fn polynomial_to_term(
    poly: &Polynomial,
    bank: &mut TermBank,
    monomials: &MonomialBank,
) -> TermId {
    let arith = bank.signature.interpret_arithmetic();
    if poly.is_zero() {
        let zero = bank.signature.numeral(0);
        return bank.constant(zero);
    }
    let mut acc: Option<TermId> = None;
    for &(c, m) in &poly.terms {
        let mono_term = monomial_to_term(m, bank, monomials);
        let term = match (c, mono_term) {
            (1, Some(t)) => t,
            (c, Some(t)) => {
                let num = bank.signature.numeral(c);
                let cnum = bank.constant(num);
                bank.app(arith.product, vec![cnum, t])
            }
            (c, None) => {
                let num = bank.signature.numeral(c);
                bank.constant(num)
            }
        };
        acc = Some(match acc {
            None => term,
            Some(prev) => bank.app(arith.sum, vec![prev, term]),
        });
    }
    acc.expect("nonzero polynomial has terms")
}

fn monomial_to_term(
    m: MonomialId,
    bank: &mut TermBank,
    monomials: &MonomialBank,
) -> Option<TermId> {
    let data = monomials.data(m);
    if data.is_unit() {
        return None;
    }
    let arith = bank.signature.interpret_arithmetic();
    let mut acc: Option<TermId> = None;
    for &(t, e) in &data.factors {
        for _ in 0..e {
            acc = Some(match acc {
                None => t,
                Some(prev) => bank.app(arith.product, vec![prev, t]),
            });
        }
    }
    acc
}

/// Build the literal `p > 0` from a polynomial.
pub fn greater_zero_literal(
    poly: &Polynomial,
    bank: &mut TermBank,
    monomials: &MonomialBank,
) -> LiteralId {
    let arith = bank.signature.interpret_arithmetic();
    let lhs = polynomial_to_term(poly, bank, monomials);
    let zero = bank.signature.numeral(0);
    let rhs = bank.constant(zero);
    bank.positive(arith.greater, vec![lhs, rhs])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestCtx {
        bank: TermBank,
        monomials: MonomialBank,
        arith: crate::fol::ArithSymbols,
    }

    impl TestCtx {
        fn new() -> Self {
            let mut bank = TermBank::new();
            let arith = bank.signature.interpret_arithmetic();
            TestCtx {
                bank,
                monomials: MonomialBank::new(),
                arith,
            }
        }

        fn int_const(&mut self, name: &str) -> TermId {
            let int = self.bank.signature.integer_sort();
            let id = self.bank.signature.add_function(name, &[], int);
            self.bank.constant(id)
        }

        fn num(&mut self, value: i32) -> TermId {
            let id = self.bank.signature.numeral(value);
            self.bank.constant(id)
        }

        fn gt_zero(&mut self, lhs: TermId) -> LiteralId {
            let zero = self.num(0);
            self.bank.positive(self.arith.greater, vec![lhs, zero])
        }
    }

    #[test]
    fn test_inequality_view() {
        let mut ctx = TestCtx::new();
        let a = ctx.int_const("a");
        let lit = ctx.gt_zero(a);

        match inequality_view(lit, &ctx.bank, &mut ctx.monomials) {
            IneqView::Greater(poly) => {
                let ma = ctx.monomials.atom(a);
                assert_eq!(poly.coefficient(ma), 1);
            }
            other => panic!("expected Greater, got {:?}", other),
        }
    }

    #[test]
    fn test_less_swaps_sides() {
        let mut ctx = TestCtx::new();
        let a = ctx.int_const("a");
        let zero = ctx.num(0);
        // $less(0, a) means a > 0
        let lit = ctx.bank.positive(ctx.arith.less, vec![zero, a]);
        match inequality_view(lit, &ctx.bank, &mut ctx.monomials) {
            IneqView::Greater(poly) => {
                let ma = ctx.monomials.atom(a);
                assert_eq!(poly.coefficient(ma), 1);
            }
            other => panic!("expected Greater, got {:?}", other),
        }
    }

    #[test]
    fn test_non_arith_literal() {
        let mut ctx = TestCtx::new();
        let p = ctx.bank.signature.add_plain_predicate("p", 0);
        let lit = ctx.bank.positive(p, vec![]);
        assert_eq!(
            inequality_view(lit, &ctx.bank, &mut ctx.monomials),
            IneqView::NotArith
        );
    }

    #[test]
    fn test_resolve_inequalities() {
        let mut ctx = TestCtx::new();
        let int = ctx.bank.signature.integer_sort();
        let f = ctx.bank.signature.add_function("f", &[int], int);
        let a = ctx.int_const("a");
        let b = ctx.int_const("b");
        let fa = ctx.bank.app(f, vec![a]);

        // p = 2·f(a), q = -f(a) + b; resolvent = 2·b
        let two = ctx.num(2);
        let two_fa = ctx.bank.app(ctx.arith.product, vec![two, fa]);
        let p = normalize(two_fa, &ctx.bank, &mut ctx.monomials).unwrap();

        let minus_fa = ctx.bank.app(ctx.arith.uminus, vec![fa]);
        let q_term = ctx.bank.app(ctx.arith.sum, vec![minus_fa, b]);
        let q = normalize(q_term, &ctx.bank, &mut ctx.monomials).unwrap();

        match resolve_inequalities(&p, &q, &ctx.monomials) {
            IneqResolution::Resolvent(r) => {
                let mb = ctx.monomials.atom(b);
                assert_eq!(r.coefficient(mb), 2);
                assert_eq!(r.terms.len(), 1);
            }
            other => panic!("expected resolvent, got {:?}", other),
        }
    }

    #[test]
    fn test_resolution_requires_opposed_signs() {
        let mut ctx = TestCtx::new();
        let a = ctx.int_const("a");
        let p = normalize(a, &ctx.bank, &mut ctx.monomials).unwrap();
        // Same sign on the shared monomial: nothing to clear
        assert_eq!(
            resolve_inequalities(&p, &p, &ctx.monomials),
            IneqResolution::NoOpposedMonomial
        );
    }

    #[test]
    fn test_resolution_overflow_skipped() {
        let mut ctx = TestCtx::new();
        let a = ctx.int_const("a");
        let big = ctx.num(1 << 30);
        let big_a = ctx.bank.app(ctx.arith.product, vec![big, a]);
        let p = normalize(big_a, &ctx.bank, &mut ctx.monomials).unwrap();

        let three = ctx.num(3);
        let minus_a = ctx.bank.app(ctx.arith.uminus, vec![a]);
        let three_ma = ctx.bank.app(ctx.arith.product, vec![three, minus_a]);
        let q = normalize(three_ma, &ctx.bank, &mut ctx.monomials).unwrap();

        // lcm(2^30, 3) overflows i32
        assert_eq!(
            resolve_inequalities(&p, &q, &ctx.monomials),
            IneqResolution::Overflow
        );
    }

    #[test]
    fn test_polynomial_term_round_trip() {
        let mut ctx = TestCtx::new();
        let a = ctx.int_const("a");
        let two = ctx.num(2);
        let two_a = ctx.bank.app(ctx.arith.product, vec![two, a]);
        let five = ctx.num(5);
        let expr = ctx.bank.app(ctx.arith.sum, vec![two_a, five]);

        let poly = normalize(expr, &ctx.bank, &mut ctx.monomials).unwrap();
        let rebuilt = polynomial_to_term(&poly, &mut ctx.bank, &ctx.monomials);
        let poly2 = normalize(rebuilt, &ctx.bank, &mut ctx.monomials).unwrap();
        assert_eq!(poly, poly2);
    }
}
