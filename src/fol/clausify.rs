//! Conversion from formulas to clauses
//!
//! The standard pipeline: NNF, Skolemization of existentials under the
//! current universal scope, dropping of universal quantifiers, and
//! distribution of disjunction over conjunction. Skolem symbols introduced
//! here are flagged in the signature and recorded in the symbol-to-variable
//! map that the induction engine uses to invert Skolemization.

use super::clause::{Clause, ClauseRole};
use super::formula::Formula;
use super::signature::FunctionId;
use super::substitution::Substitution;
use super::term::{TermBank, TermId};
use std::collections::HashMap;

/// Clausifier state: Skolem bookkeeping survives across units so the
/// skolem map covers the whole problem.
#[derive(Debug, Default)]
pub struct Clausifier {
    /// Skolem symbol to the original existential variable it replaced.
    skolem_map: HashMap<FunctionId, u32>,
}

impl Clausifier {
    pub fn new() -> Self {
        Clausifier {
            skolem_map: HashMap::new(),
        }
    }

    /// The Skolem-symbol-to-original-variable map accumulated so far.
    pub fn skolem_map(&self) -> &HashMap<FunctionId, u32> {
        &self.skolem_map
    }

    /// Convert a formula to an equisatisfiable clause list.
    pub fn clausify(&mut self, formula: Formula, role: ClauseRole, bank: &mut TermBank) -> Vec<Clause> {
        let closed = formula.quantify(bank);
        let nnf = closed.to_nnf(bank);
        let skolemized = self.skolemize(nnf, &mut Vec::new(), bank);
        let matrix = strip_universals(skolemized);
        let clause_lits = distribute(matrix, bank);
        clause_lits
            .into_iter()
            .map(|mut lits| {
                lits.dedup();
                Clause::input(lits, role, bank)
            })
            .collect()
    }

    /// Eliminate existential quantifiers under the running universal scope.
    fn skolemize(&mut self, formula: Formula, universals: &mut Vec<u32>, bank: &mut TermBank) -> Formula {
        match formula {
            f @ Formula::Literal(_) => f,
            Formula::Not(f) => {
                // NNF input: negation only wraps literals
                Formula::not(self.skolemize(*f, universals, bank))
            }
            Formula::And(fs) => Formula::And(
                fs.into_iter()
                    .map(|f| self.skolemize(f, universals, bank))
                    .collect(),
            ),
            Formula::Or(fs) => Formula::Or(
                fs.into_iter()
                    .map(|f| self.skolemize(f, universals, bank))
                    .collect(),
            ),
            Formula::Implies(..) | Formula::Iff(..) => {
                unreachable!("implications are eliminated by NNF")
            }
            Formula::Forall(vs, f) => {
                let before = universals.len();
                universals.extend_from_slice(&vs);
                let body = self.skolemize(*f, universals, bank);
                universals.truncate(before);
                Formula::Forall(vs, Box::new(body))
            }
            Formula::Exists(vs, f) => {
                let mut subst = Substitution::new();
                let default = bank.signature.default_sort();
                for &v in &vs {
                    let arg_sorts = vec![default; universals.len()];
                    let sk = bank.signature.add_skolem(&arg_sorts, default);
                    self.skolem_map.insert(sk, v);
                    let args: Vec<TermId> = universals.iter().map(|&u| bank.var(u)).collect();
                    let sk_term = bank.app(sk, args);
                    subst.bind(v, sk_term);
                }
                let body = f.apply_substitution(&subst, bank);
                self.skolemize(body, universals, bank)
            }
        }
    }
}

/// Remove the (now implicit) universal quantifiers.
fn strip_universals(formula: Formula) -> Formula {
    match formula {
        Formula::Forall(_, f) => strip_universals(*f),
        Formula::And(fs) => Formula::And(fs.into_iter().map(strip_universals).collect()),
        Formula::Or(fs) => Formula::Or(fs.into_iter().map(strip_universals).collect()),
        other => other,
    }
}

/// Distribute disjunction over conjunction, producing literal lists.
fn distribute(formula: Formula, bank: &mut TermBank) -> Vec<Vec<super::literal::LiteralId>> {
    match formula {
        Formula::Literal(l) => vec![vec![l]],
        Formula::Not(f) => match *f {
            Formula::Literal(l) => {
                let c = bank.complement(l);
                vec![vec![c]]
            }
            other => {
                let nnf = Formula::not(other).to_nnf(bank);
                distribute(nnf, bank)
            }
        },
        Formula::And(fs) => fs.into_iter().flat_map(|f| distribute(f, bank)).collect(),
        Formula::Or(fs) => {
            let mut acc: Vec<Vec<super::literal::LiteralId>> = vec![vec![]];
            for f in fs {
                let sub = distribute(f, bank);
                let mut next = Vec::with_capacity(acc.len() * sub.len());
                for base in &acc {
                    for branch in &sub {
                        let mut merged = base.clone();
                        merged.extend_from_slice(branch);
                        next.push(merged);
                    }
                }
                acc = next;
            }
            acc
        }
        Formula::Forall(_, f) => distribute(*f, bank),
        Formula::Implies(..) | Formula::Iff(..) | Formula::Exists(..) => {
            unreachable!("eliminated before distribution")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clausify_conjunction() {
        let mut bank = TermBank::new();
        let mut clausifier = Clausifier::new();
        let p = bank.signature.add_plain_predicate("p", 0);
        let q = bank.signature.add_plain_predicate("q", 0);
        let lp = bank.positive(p, vec![]);
        let lq = bank.positive(q, vec![]);

        let f = Formula::And(vec![Formula::lit(lp), Formula::lit(lq)]);
        let clauses = clausifier.clausify(f, ClauseRole::Axiom, &mut bank);
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].literals, vec![lp]);
        assert_eq!(clauses[1].literals, vec![lq]);
    }

    #[test]
    fn test_clausify_distribution() {
        let mut bank = TermBank::new();
        let mut clausifier = Clausifier::new();
        let p = bank.signature.add_plain_predicate("p", 0);
        let q = bank.signature.add_plain_predicate("q", 0);
        let r = bank.signature.add_plain_predicate("r", 0);
        let lp = bank.positive(p, vec![]);
        let lq = bank.positive(q, vec![]);
        let lr = bank.positive(r, vec![]);

        // p | (q & r) distributes to (p | q) & (p | r)
        let f = Formula::Or(vec![
            Formula::lit(lp),
            Formula::And(vec![Formula::lit(lq), Formula::lit(lr)]),
        ]);
        let clauses = clausifier.clausify(f, ClauseRole::Axiom, &mut bank);
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].literals, vec![lp, lq]);
        assert_eq!(clauses[1].literals, vec![lp, lr]);
    }

    #[test]
    fn test_skolemization_under_universals() {
        let mut bank = TermBank::new();
        let mut clausifier = Clausifier::new();
        let p = bank.signature.add_plain_predicate("p", 2);
        let x = bank.var(0);
        let y = bank.var(1);
        let l = bank.positive(p, vec![x, y]);

        // ![X]: ?[Y]: p(X, Y) gives p(X, sk(X))
        let f = Formula::Forall(
            vec![0],
            Box::new(Formula::Exists(vec![1], Box::new(Formula::lit(l)))),
        );
        let clauses = clausifier.clausify(f, ClauseRole::Axiom, &mut bank);
        assert_eq!(clauses.len(), 1);
        let lit = clauses[0].literals[0];
        let args = bank.literal_args(lit).to_vec();
        assert_eq!(args[0], x);
        // Second argument is a unary skolem applied to X
        let sk = bank.functor(args[1]).expect("skolem term");
        assert!(bank.signature.is_skolem(sk));
        assert_eq!(bank.args(args[1]), &[x]);
        // The skolem map remembers the replaced variable
        assert_eq!(clausifier.skolem_map().get(&sk), Some(&1));
    }

    #[test]
    fn test_negated_conjecture_clausification() {
        let mut bank = TermBank::new();
        let mut clausifier = Clausifier::new();
        let p = bank.signature.add_plain_predicate("p", 1);
        let x = bank.var(0);
        let l = bank.positive(p, vec![x]);

        // ~(?[X]: p(X)) becomes the single clause ~p(X)
        let f = Formula::not(Formula::Exists(vec![0], Box::new(Formula::lit(l))));
        let clauses = clausifier.clausify(f, ClauseRole::NegatedConjecture, &mut bank);
        assert_eq!(clauses.len(), 1);
        let lit = clauses[0].literals[0];
        assert!(!bank.literal_polarity(lit));
        assert!(clauses[0].role.is_goal());
    }
}
