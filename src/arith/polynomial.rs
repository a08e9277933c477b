//! Canonical polynomials over hash-consed monomials
//!
//! Every arithmetic expression normalizes to `Σ cᵢ · Πⱼ tᵢⱼ^eᵢⱼ`: a sorted,
//! zero-free list of (coefficient, monomial) pairs, where a monomial is a
//! sorted list of (atomic term, exponent) factors interned in the
//! `MonomialBank`. Monomial identity is handle identity, so polynomials
//! merge by sorted scan.
//!
//! Coefficients are machine integers under checked arithmetic: any overflow
//! makes the whole normalization (or the consulting inference) decline
//! rather than produce an unsound result.

use crate::fol::{ArithFunction, TermBank, TermData, TermId};
use std::collections::HashMap;

/// Coefficient type. Fixed width; every operation is checked.
pub type Coeff = i32;

/// Handle of an interned monomial.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonomialId(u32);

/// Product of atomic-term powers, sorted by term handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonomialData {
    pub factors: Vec<(TermId, u32)>,
}

impl MonomialData {
    fn unit() -> Self {
        MonomialData {
            factors: Vec::new(),
        }
    }

    pub fn is_unit(&self) -> bool {
        self.factors.is_empty()
    }
}

/// Intern table for monomials.
#[derive(Debug, Default)]
pub struct MonomialBank {
    monomials: Vec<MonomialData>,
    dedup: HashMap<MonomialData, MonomialId>,
}

impl MonomialBank {
    pub fn new() -> Self {
        MonomialBank::default()
    }

    pub fn intern(&mut self, mut factors: Vec<(TermId, u32)>) -> MonomialId {
        factors.retain(|&(_, e)| e > 0);
        factors.sort_by_key(|&(t, _)| t);
        // Merge equal atoms
        let mut merged: Vec<(TermId, u32)> = Vec::with_capacity(factors.len());
        for (t, e) in factors {
            match merged.last_mut() {
                Some((lt, le)) if *lt == t => *le += e,
                _ => merged.push((t, e)),
            }
        }
        let data = MonomialData { factors: merged };
        if let Some(&id) = self.dedup.get(&data) {
            return id;
        }
        let id = MonomialId(self.monomials.len() as u32);
        self.monomials.push(data.clone());
        self.dedup.insert(data, id);
        id
    }

    pub fn unit(&mut self) -> MonomialId {
        self.intern(Vec::new())
    }

    pub fn atom(&mut self, term: TermId) -> MonomialId {
        self.intern(vec![(term, 1)])
    }

    pub fn data(&self, id: MonomialId) -> &MonomialData {
        &self.monomials[id.0 as usize]
    }

    /// Product of two monomials.
    pub fn multiply(&mut self, a: MonomialId, b: MonomialId) -> MonomialId {
        let mut factors = self.data(a).factors.clone();
        factors.extend_from_slice(&self.data(b).factors);
        self.intern(factors)
    }
}

/// Canonical polynomial: sorted by monomial handle, no zero coefficients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial {
    /// (coefficient, monomial) pairs sorted by monomial
    pub terms: Vec<(Coeff, MonomialId)>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Polynomial { terms: Vec::new() }
    }

    pub fn constant(c: Coeff, monomials: &mut MonomialBank) -> Self {
        if c == 0 {
            return Polynomial::zero();
        }
        Polynomial {
            terms: vec![(c, monomials.unit())],
        }
    }

    pub fn atom(term: TermId, monomials: &mut MonomialBank) -> Self {
        Polynomial {
            terms: vec![(1, monomials.atom(term))],
        }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The constant value, if the polynomial is a constant.
    pub fn as_constant(&self, monomials: &MonomialBank) -> Option<Coeff> {
        match self.terms.as_slice() {
            [] => Some(0),
            [(c, m)] if monomials.data(*m).is_unit() => Some(*c),
            _ => None,
        }
    }

    /// Coefficient of a monomial (0 if absent).
    pub fn coefficient(&self, monomial: MonomialId) -> Coeff {
        self.terms
            .iter()
            .find(|&&(_, m)| m == monomial)
            .map(|&(c, _)| c)
            .unwrap_or(0)
    }

    /// Sorted-merge addition with cancellation. None on overflow.
    pub fn add(&self, other: &Polynomial) -> Option<Polynomial> {
        let mut terms = Vec::with_capacity(self.terms.len() + other.terms.len());
        let (mut i, mut j) = (0, 0);
        while i < self.terms.len() || j < other.terms.len() {
            if j >= other.terms.len()
                || (i < self.terms.len() && self.terms[i].1 < other.terms[j].1)
            {
                terms.push(self.terms[i]);
                i += 1;
            } else if i >= self.terms.len() || other.terms[j].1 < self.terms[i].1 {
                terms.push(other.terms[j]);
                j += 1;
            } else {
                let c = self.terms[i].0.checked_add(other.terms[j].0)?;
                if c != 0 {
                    terms.push((c, self.terms[i].1));
                }
                i += 1;
                j += 1;
            }
        }
        Some(Polynomial { terms })
    }

    /// Scale by a constant. None on overflow.
    pub fn scale(&self, factor: Coeff) -> Option<Polynomial> {
        if factor == 0 {
            return Some(Polynomial::zero());
        }
        let mut terms = Vec::with_capacity(self.terms.len());
        for &(c, m) in &self.terms {
            terms.push((c.checked_mul(factor)?, m));
        }
        Some(Polynomial { terms })
    }

    pub fn negate(&self) -> Option<Polynomial> {
        self.scale(-1)
    }

    /// Polynomial product. None on overflow.
    pub fn multiply(&self, other: &Polynomial, monomials: &mut MonomialBank) -> Option<Polynomial> {
        let mut acc = Polynomial::zero();
        for &(ca, ma) in &self.terms {
            let mut partial = Vec::with_capacity(other.terms.len());
            for &(cb, mb) in &other.terms {
                let c = ca.checked_mul(cb)?;
                partial.push((c, monomials.multiply(ma, mb)));
            }
            partial.sort_by_key(|&(_, m)| m);
            let partial = Polynomial { terms: partial };
            acc = acc.add(&partial)?;
        }
        Some(acc)
    }

    /// The leading (largest-handle) monomial and its coefficient, skipping
    /// the unit monomial.
    pub fn leading(&self, monomials: &MonomialBank) -> Option<(Coeff, MonomialId)> {
        self.terms
            .iter()
            .rev()
            .find(|&&(_, m)| !monomials.data(m).is_unit())
            .copied()
    }
}

/// Normalize an arithmetic term into a canonical polynomial. Interpreted
/// symbols ($sum, $product, $uminus, numerals) are evaluated structurally;
/// anything else becomes an atomic monomial. Returns None when a
/// coefficient overflows.
pub fn normalize(term: TermId, bank: &TermBank, monomials: &mut MonomialBank) -> Option<Polynomial> {
    match bank.term_data(term).clone() {
        TermData::Var(_) => Some(Polynomial::atom(term, monomials)),
        TermData::App { functor, args } => {
            if let Some(value) = bank.signature.numeral_value(functor) {
                return Some(Polynomial::constant(value, monomials));
            }
            match bank.signature.arith_function(functor) {
                Some(ArithFunction::Sum) => {
                    let lhs = normalize(args[0], bank, monomials)?;
                    let rhs = normalize(args[1], bank, monomials)?;
                    lhs.add(&rhs)
                }
                Some(ArithFunction::Product) => {
                    let lhs = normalize(args[0], bank, monomials)?;
                    let rhs = normalize(args[1], bank, monomials)?;
                    lhs.multiply(&rhs, monomials)
                }
                Some(ArithFunction::UnaryMinus) => {
                    let inner = normalize(args[0], bank, monomials)?;
                    inner.negate()
                }
                None => Some(Polynomial::atom(term, monomials)),
            }
        }
    }
}

/// Least common multiple under checked arithmetic.
pub fn checked_lcm(a: Coeff, b: Coeff) -> Option<Coeff> {
    if a == 0 || b == 0 {
        return None;
    }
    let g = gcd(a.unsigned_abs(), b.unsigned_abs());
    let a_red = (a.unsigned_abs() / g) as i64;
    let prod = a_red.checked_mul(b.unsigned_abs() as i64)?;
    Coeff::try_from(prod).ok()
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
