//! First-order formulas
//!
//! Formula trees are used at the input boundary (before clausification) and
//! by the induction engine when it assembles hypothesis formulas. The
//! saturation core itself only ever sees clauses.

use super::literal::LiteralId;
use super::substitution::Substitution;
use super::term::TermBank;
use std::fmt;

/// A first-order formula over shared literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    Literal(LiteralId),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Iff(Box<Formula>, Box<Formula>),
    Forall(Vec<u32>, Box<Formula>),
    Exists(Vec<u32>, Box<Formula>),
}

impl Formula {
    pub fn lit(l: LiteralId) -> Formula {
        Formula::Literal(l)
    }

    pub fn not(f: Formula) -> Formula {
        Formula::Not(Box::new(f))
    }

    pub fn implies(lhs: Formula, rhs: Formula) -> Formula {
        Formula::Implies(Box::new(lhs), Box::new(rhs))
    }

    pub fn iff(lhs: Formula, rhs: Formula) -> Formula {
        Formula::Iff(Box::new(lhs), Box::new(rhs))
    }

    /// N-ary conjunction, flattening trivial cases.
    pub fn and(mut fs: Vec<Formula>) -> Formula {
        if fs.len() == 1 {
            fs.pop().unwrap()
        } else {
            Formula::And(fs)
        }
    }

    /// N-ary disjunction, flattening trivial cases.
    pub fn or(mut fs: Vec<Formula>) -> Formula {
        if fs.len() == 1 {
            fs.pop().unwrap()
        } else {
            Formula::Or(fs)
        }
    }

    /// Collect the free variable indices.
    pub fn free_vars(&self, bank: &TermBank) -> Vec<u32> {
        let mut out = Vec::new();
        self.free_vars_rec(bank, &mut Vec::new(), &mut out);
        out
    }

    fn free_vars_rec(&self, bank: &TermBank, bound: &mut Vec<u32>, out: &mut Vec<u32>) {
        match self {
            Formula::Literal(l) => {
                let mut vars = Vec::new();
                bank.literal_collect_vars(*l, &mut vars);
                for v in vars {
                    if !bound.contains(&v) && !out.contains(&v) {
                        out.push(v);
                    }
                }
            }
            Formula::Not(f) => f.free_vars_rec(bank, bound, out),
            Formula::And(fs) | Formula::Or(fs) => {
                for f in fs {
                    f.free_vars_rec(bank, bound, out);
                }
            }
            Formula::Implies(a, b) | Formula::Iff(a, b) => {
                a.free_vars_rec(bank, bound, out);
                b.free_vars_rec(bank, bound, out);
            }
            Formula::Forall(vs, f) | Formula::Exists(vs, f) => {
                let before = bound.len();
                bound.extend_from_slice(vs);
                f.free_vars_rec(bank, bound, out);
                bound.truncate(before);
            }
        }
    }

    /// Universally close the formula over its free variables.
    pub fn quantify(self, bank: &TermBank) -> Formula {
        let vars = self.free_vars(bank);
        if vars.is_empty() {
            self
        } else {
            Formula::Forall(vars, Box::new(self))
        }
    }

    /// Apply a substitution to every literal. Quantified variables are
    /// assumed disjoint from the substitution's domain (the clausifier and
    /// the induction engine rename apart before substituting).
    pub fn apply_substitution(&self, subst: &Substitution, bank: &mut TermBank) -> Formula {
        match self {
            Formula::Literal(l) => Formula::Literal(subst.apply_literal(*l, bank)),
            Formula::Not(f) => Formula::not(f.apply_substitution(subst, bank)),
            Formula::And(fs) => {
                Formula::And(fs.iter().map(|f| f.apply_substitution(subst, bank)).collect())
            }
            Formula::Or(fs) => {
                Formula::Or(fs.iter().map(|f| f.apply_substitution(subst, bank)).collect())
            }
            Formula::Implies(a, b) => Formula::implies(
                a.apply_substitution(subst, bank),
                b.apply_substitution(subst, bank),
            ),
            Formula::Iff(a, b) => Formula::iff(
                a.apply_substitution(subst, bank),
                b.apply_substitution(subst, bank),
            ),
            Formula::Forall(vs, f) => {
                Formula::Forall(vs.clone(), Box::new(f.apply_substitution(subst, bank)))
            }
            Formula::Exists(vs, f) => {
                Formula::Exists(vs.clone(), Box::new(f.apply_substitution(subst, bank)))
            }
        }
    }

    /// Negation normal form: negations pushed to literals, implications and
    /// equivalences eliminated.
    pub fn to_nnf(self, bank: &mut TermBank) -> Formula {
        self.nnf(false, bank)
    }

    fn nnf(self, negated: bool, bank: &mut TermBank) -> Formula {
        match self {
            Formula::Literal(l) => {
                if negated {
                    Formula::Literal(bank.complement(l))
                } else {
                    Formula::Literal(l)
                }
            }
            Formula::Not(f) => f.nnf(!negated, bank),
            Formula::And(fs) => {
                let parts: Vec<Formula> = fs.into_iter().map(|f| f.nnf(negated, bank)).collect();
                if negated {
                    Formula::Or(parts)
                } else {
                    Formula::And(parts)
                }
            }
            Formula::Or(fs) => {
                let parts: Vec<Formula> = fs.into_iter().map(|f| f.nnf(negated, bank)).collect();
                if negated {
                    Formula::And(parts)
                } else {
                    Formula::Or(parts)
                }
            }
            Formula::Implies(a, b) => {
                // a -> b == ~a | b
                let rewritten = Formula::Or(vec![Formula::not(*a), *b]);
                rewritten.nnf(negated, bank)
            }
            Formula::Iff(a, b) => {
                // a <-> b == (a -> b) & (b -> a)
                let fwd = Formula::implies((*a).clone(), (*b).clone());
                let bwd = Formula::implies(*b, *a);
                Formula::And(vec![fwd, bwd]).nnf(negated, bank)
            }
            Formula::Forall(vs, f) => {
                let body = Box::new(f.nnf(negated, bank));
                if negated {
                    Formula::Exists(vs, body)
                } else {
                    Formula::Forall(vs, body)
                }
            }
            Formula::Exists(vs, f) => {
                let body = Box::new(f.nnf(negated, bank));
                if negated {
                    Formula::Forall(vs, body)
                } else {
                    Formula::Exists(vs, body)
                }
            }
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Literal(l) => write!(f, "L{}", l.as_u32()),
            Formula::Not(inner) => write!(f, "~({})", inner),
            Formula::And(fs) => {
                write!(f, "(")?;
                for (i, part) in fs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    write!(f, "{}", part)?;
                }
                write!(f, ")")
            }
            Formula::Or(fs) => {
                write!(f, "(")?;
                for (i, part) in fs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", part)?;
                }
                write!(f, ")")
            }
            Formula::Implies(a, b) => write!(f, "({} => {})", a, b),
            Formula::Iff(a, b) => write!(f, "({} <=> {})", a, b),
            Formula::Forall(vs, inner) => write!(f, "![{:?}]: {}", vs, inner),
            Formula::Exists(vs, inner) => write!(f, "?[{:?}]: {}", vs, inner),
        }
    }
}
