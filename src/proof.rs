//! Derivation records and proof extraction
//!
//! Every clause carries a `Derivation` naming the rule that produced it and
//! the premise clause indices. The derivation graph supports ancestor
//! queries and a topological proof emitter; the refutation (the empty
//! clause) is printed last.

use crate::fol::{Clause, TermBank, TermId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write as _;

/// The inference rule that produced a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InferenceRule {
    Input,
    Clausification,
    Resolution,
    Factoring,
    Superposition,
    EqualityResolution,
    EqualityFactoring,
    Demodulation,
    SubsumptionResolution,
    InequalityResolution,
    ArithmeticFactoring,
    Induction,
    Splitting,
    DuplicateLiteralRemoval,
    ArithmeticRefutation,
}

impl InferenceRule {
    pub fn name(self) -> &'static str {
        match self {
            InferenceRule::Input => "input",
            InferenceRule::Clausification => "clausification",
            InferenceRule::Resolution => "resolution",
            InferenceRule::Factoring => "factoring",
            InferenceRule::Superposition => "superposition",
            InferenceRule::EqualityResolution => "equality_resolution",
            InferenceRule::EqualityFactoring => "equality_factoring",
            InferenceRule::Demodulation => "demodulation",
            InferenceRule::SubsumptionResolution => "subsumption_resolution",
            InferenceRule::InequalityResolution => "inequality_resolution",
            InferenceRule::ArithmeticFactoring => "arithmetic_factoring",
            InferenceRule::Induction => "induction",
            InferenceRule::Splitting => "splitting",
            InferenceRule::DuplicateLiteralRemoval => "duplicate_literal_removal",
            InferenceRule::ArithmeticRefutation => "arithmetic_refutation",
        }
    }
}

/// Rewriting metadata attached to rewriting inferences (demodulation,
/// superposition): which term was rewritten into which.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteInfo {
    pub from: TermId,
    pub to: TermId,
}

/// Inference record: rule kind, premise clause indices, and optional
/// rewriting metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Derivation {
    pub rule: InferenceRule,
    pub premises: Vec<usize>,
    pub rewrite: Option<RewriteInfo>,
}

impl Derivation {
    pub fn input() -> Self {
        Derivation {
            rule: InferenceRule::Input,
            premises: Vec::new(),
            rewrite: None,
        }
    }

    pub fn new(rule: InferenceRule, premises: Vec<usize>) -> Self {
        Derivation {
            rule,
            premises,
            rewrite: None,
        }
    }

    pub fn with_rewrite(rule: InferenceRule, premises: Vec<usize>, from: TermId, to: TermId) -> Self {
        Derivation {
            rule,
            premises,
            rewrite: Some(RewriteInfo { from, to }),
        }
    }
}

/// Read access to the derivation graph stored across the clause arena.
pub struct ProofStore<'a> {
    clauses: &'a [Clause],
}

impl<'a> ProofStore<'a> {
    pub fn new(clauses: &'a [Clause]) -> Self {
        ProofStore { clauses }
    }

    pub fn rule(&self, clause: usize) -> InferenceRule {
        self.clauses[clause].derivation.rule
    }

    pub fn premises(&self, clause: usize) -> &[usize] {
        &self.clauses[clause].derivation.premises
    }

    /// All transitive ancestors of a clause (excluding itself), in
    /// topological order (premises before conclusions).
    pub fn ancestors(&self, clause: usize) -> Vec<usize> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        self.visit(clause, &mut visited, &mut order);
        order.pop();
        order
    }

    fn visit(&self, clause: usize, visited: &mut HashSet<usize>, order: &mut Vec<usize>) {
        if !visited.insert(clause) {
            return;
        }
        for &p in &self.clauses[clause].derivation.premises {
            self.visit(p, visited, order);
        }
        order.push(clause);
    }

    /// Emit the refutation (or any clause's derivation) as text: each line
    /// carries id, literals, rule, and premises; the target clause last.
    pub fn write_proof(&self, target: usize, bank: &TermBank) -> String {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        self.visit(target, &mut visited, &mut order);

        let mut out = String::new();
        for idx in order {
            let clause = &self.clauses[idx];
            let premises = clause
                .derivation
                .premises
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(",");
            let _ = writeln!(
                out,
                "{}. {} [{}{}{}]",
                idx,
                clause.display(bank),
                clause.derivation.rule.name(),
                if premises.is_empty() { "" } else { " " },
                premises
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::ClauseRole;

    fn input_clause(bank: &TermBank, lits: Vec<crate::fol::LiteralId>) -> Clause {
        Clause::input(lits, ClauseRole::Axiom, bank)
    }

    #[test]
    fn test_ancestors_topological() {
        let mut bank = TermBank::new();
        let p = bank.signature.add_plain_predicate("p", 0);
        let lit = bank.positive(p, vec![]);
        let nlit = bank.negative(p, vec![]);

        // 0: p   1: ~p   2: empty (resolution of 0, 1)
        let clauses = vec![
            input_clause(&bank, vec![lit]),
            input_clause(&bank, vec![nlit]),
            Clause::derived(
                vec![],
                Derivation::new(InferenceRule::Resolution, vec![0, 1]),
                1,
                &bank,
            ),
        ];

        let store = ProofStore::new(&clauses);
        let ancestors = store.ancestors(2);
        assert_eq!(ancestors, vec![0, 1]);
        assert_eq!(store.rule(2), InferenceRule::Resolution);
        assert_eq!(store.premises(2), &[0, 1]);
    }

    #[test]
    fn test_proof_text_ends_with_refutation() {
        let mut bank = TermBank::new();
        let p = bank.signature.add_plain_predicate("p", 0);
        let lit = bank.positive(p, vec![]);
        let nlit = bank.negative(p, vec![]);

        let clauses = vec![
            input_clause(&bank, vec![lit]),
            input_clause(&bank, vec![nlit]),
            Clause::derived(
                vec![],
                Derivation::new(InferenceRule::Resolution, vec![0, 1]),
                1,
                &bank,
            ),
        ];

        let store = ProofStore::new(&clauses);
        let text = store.write_proof(2, &bank);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("$false"));
        assert!(lines[2].contains("resolution"));
        assert!(lines[0].contains("[input]"));
    }

    #[test]
    fn test_shared_premise_emitted_once() {
        let mut bank = TermBank::new();
        let p = bank.signature.add_plain_predicate("p", 0);
        let lit = bank.positive(p, vec![]);

        // Clause 0 feeds both 1 and 2; 3 uses 1 and 2.
        let clauses = vec![
            input_clause(&bank, vec![lit]),
            Clause::derived(
                vec![lit],
                Derivation::new(InferenceRule::Factoring, vec![0]),
                1,
                &bank,
            ),
            Clause::derived(
                vec![lit],
                Derivation::new(InferenceRule::Factoring, vec![0]),
                1,
                &bank,
            ),
            Clause::derived(
                vec![],
                Derivation::new(InferenceRule::Resolution, vec![1, 2]),
                2,
                &bank,
            ),
        ];
        let store = ProofStore::new(&clauses);
        let text = store.write_proof(3, &bank);
        let zero_lines = text
            .lines()
            .filter(|l| l.starts_with("0."))
            .count();
        assert_eq!(zero_lines, 1);
    }
}
