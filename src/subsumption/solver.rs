//! Small SAT solver with a pluggable binding theory
//!
//! The subsumption constraint systems are tiny (one variable per match
//! row), so the solver is a plain DPLL: counting unit propagation,
//! chronological backtracking, decisions in variable-creation order with
//! `true` tried first. A theory hook observes every `true` assignment and
//! may veto it; a veto names the earlier variable it conflicts with, and
//! the pair is learned as a binary conflict clause so the search never
//! revisits it.

/// A literal of the constraint system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lit {
    pub var: usize,
    pub positive: bool,
}

impl Lit {
    pub fn pos(var: usize) -> Lit {
        Lit {
            var,
            positive: true,
        }
    }

    pub fn neg(var: usize) -> Lit {
        Lit {
            var,
            positive: false,
        }
    }
}

/// Theory attached to the solver: observes true assignments and retractions.
pub trait Theory {
    /// `var` was assigned true. On an inconsistency, return the earlier
    /// true variable the assignment conflicts with.
    fn assert_true(&mut self, var: usize) -> Result<(), usize>;

    /// A previously true `var` was unassigned.
    fn retract(&mut self, var: usize);
}

/// Theory that accepts everything (plain SAT).
pub struct NoTheory;

impl Theory for NoTheory {
    fn assert_true(&mut self, _var: usize) -> Result<(), usize> {
        Ok(())
    }

    fn retract(&mut self, _var: usize) {}
}

#[derive(Debug, Clone, Copy)]
struct TrailEntry {
    var: usize,
    decision: bool,
}

/// DPLL solver over a fixed variable set.
pub struct SatSolver {
    num_vars: usize,
    clauses: Vec<Vec<Lit>>,
    assignment: Vec<Option<bool>>,
    trail: Vec<TrailEntry>,
}

impl SatSolver {
    pub fn new(num_vars: usize) -> Self {
        SatSolver {
            num_vars,
            clauses: Vec::new(),
            assignment: vec![None; num_vars],
            trail: Vec::new(),
        }
    }

    /// Add a clause (disjunction of literals). An empty clause makes the
    /// problem trivially unsatisfiable.
    pub fn add_clause(&mut self, lits: Vec<Lit>) {
        self.clauses.push(lits);
    }

    /// Add pairwise exclusion over the given variables (at most one true).
    pub fn add_at_most_one(&mut self, vars: &[usize]) {
        for (k, &a) in vars.iter().enumerate() {
            for &b in &vars[k + 1..] {
                self.add_clause(vec![Lit::neg(a), Lit::neg(b)]);
            }
        }
    }

    pub fn value(&self, var: usize) -> Option<bool> {
        self.assignment[var]
    }

    fn lit_value(&self, lit: Lit) -> Option<bool> {
        self.assignment[lit.var].map(|v| v == lit.positive)
    }

    /// Assign and notify the theory. A theory veto undoes the assignment
    /// and learns the conflicting pair as a binary clause, so propagation
    /// forces the complement and the search never revisits the pair.
    fn assign<T: Theory>(
        &mut self,
        var: usize,
        value: bool,
        decision: bool,
        theory: &mut T,
    ) -> bool {
        debug_assert!(self.assignment[var].is_none());
        self.assignment[var] = Some(value);
        self.trail.push(TrailEntry { var, decision });
        if value {
            if let Err(other) = theory.assert_true(var) {
                self.clauses.push(vec![Lit::neg(var), Lit::neg(other)]);
                self.trail.pop();
                self.assignment[var] = None;
                return false;
            }
        }
        true
    }

    /// Unit propagation to fixpoint. Returns false on conflict.
    fn propagate<T: Theory>(&mut self, theory: &mut T) -> bool {
        loop {
            let mut changed = false;
            for ci in 0..self.clauses.len() {
                let mut satisfied = false;
                let mut unassigned: Option<Lit> = None;
                let mut unassigned_count = 0;
                for &lit in &self.clauses[ci] {
                    match self.lit_value(lit) {
                        Some(true) => {
                            satisfied = true;
                            break;
                        }
                        Some(false) => {}
                        None => {
                            unassigned = Some(lit);
                            unassigned_count += 1;
                        }
                    }
                }
                if satisfied {
                    continue;
                }
                match unassigned_count {
                    0 => return false,
                    1 => {
                        let lit = unassigned.unwrap();
                        if !self.assign(lit.var, lit.positive, false, theory) {
                            return false;
                        }
                        changed = true;
                    }
                    _ => {}
                }
            }
            if !changed {
                return true;
            }
        }
    }

    /// Undo the trail down to (and including) the most recent decision and
    /// re-assign it to false as a forced assignment. Returns false when no
    /// decision remains (the problem is unsatisfiable).
    fn backtrack<T: Theory>(&mut self, theory: &mut T) -> bool {
        while let Some(entry) = self.trail.pop() {
            let was = self.assignment[entry.var].take();
            if was == Some(true) {
                theory.retract(entry.var);
            }
            if entry.decision {
                // Flip: the decision's complement is now forced
                return self.assign(entry.var, false, false, theory);
            }
        }
        false
    }

    /// Solve under the theory; decisions follow variable creation order
    /// with `true` first, so the first model is the lexicographically
    /// first compatible match assignment.
    pub fn solve<T: Theory>(&mut self, theory: &mut T) -> Option<Vec<bool>> {
        loop {
            if self.propagate(theory) {
                // Pick the lowest unassigned variable
                match (0..self.num_vars).find(|&v| self.assignment[v].is_none()) {
                    None => {
                        return Some(
                            self.assignment
                                .iter()
                                .map(|v| v.unwrap_or(false))
                                .collect(),
                        );
                    }
                    Some(var) => {
                        // A vetoed decision is not a dead end: the learned
                        // clause forces the complement on the next round.
                        let _ = self.assign(var, true, true, theory);
                    }
                }
            } else if !self.backtrack(theory) {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_sat() {
        // (a | b) & (~a | b) is satisfied by b
        let mut solver = SatSolver::new(2);
        solver.add_clause(vec![Lit::pos(0), Lit::pos(1)]);
        solver.add_clause(vec![Lit::neg(0), Lit::pos(1)]);
        let model = solver.solve(&mut NoTheory).unwrap();
        assert!(model[1]);
    }

    #[test]
    fn test_simple_unsat() {
        // a & ~a
        let mut solver = SatSolver::new(1);
        solver.add_clause(vec![Lit::pos(0)]);
        solver.add_clause(vec![Lit::neg(0)]);
        assert!(solver.solve(&mut NoTheory).is_none());
    }

    #[test]
    fn test_at_most_one() {
        let mut solver = SatSolver::new(3);
        solver.add_clause(vec![Lit::pos(0), Lit::pos(1), Lit::pos(2)]);
        solver.add_at_most_one(&[0, 1, 2]);
        let model = solver.solve(&mut NoTheory).unwrap();
        let trues = model.iter().filter(|&&b| b).count();
        assert_eq!(trues, 1);
    }

    #[test]
    fn test_decision_order_prefers_low_vars() {
        let mut solver = SatSolver::new(2);
        solver.add_clause(vec![Lit::pos(0), Lit::pos(1)]);
        let model = solver.solve(&mut NoTheory).unwrap();
        // Lowest variable tried true first
        assert!(model[0]);
    }

    /// Theory that forbids variables 0 and 1 being true together.
    struct PairVeto {
        active: Vec<bool>,
    }

    impl Theory for PairVeto {
        fn assert_true(&mut self, var: usize) -> Result<(), usize> {
            if var == 1 && self.active[0] {
                return Err(0);
            }
            if var == 0 && self.active[1] {
                return Err(1);
            }
            self.active[var] = true;
            Ok(())
        }

        fn retract(&mut self, var: usize) {
            self.active[var] = false;
        }
    }

    #[test]
    fn test_theory_conflict_forces_alternative() {
        // Both clauses demand a true variable, but the theory forbids
        // {0, 1} together; the only theory-consistent model is {0, 2}.
        let mut solver = SatSolver::new(3);
        solver.add_clause(vec![Lit::pos(0)]);
        solver.add_clause(vec![Lit::pos(1), Lit::pos(2)]);
        let mut theory = PairVeto {
            active: vec![false; 3],
        };
        let model = solver.solve(&mut theory).unwrap();
        assert!(model[0]);
        assert!(!model[1]);
        assert!(model[2]);
    }

    #[test]
    fn test_theory_unsat() {
        let mut solver = SatSolver::new(2);
        solver.add_clause(vec![Lit::pos(0)]);
        solver.add_clause(vec![Lit::pos(1)]);
        let mut theory = PairVeto {
            active: vec![false; 2],
        };
        assert!(solver.solve(&mut theory).is_none());
    }
}
