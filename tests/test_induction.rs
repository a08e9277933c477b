//! Structural induction end to end

use vulcan::fol::{FunctionId, TermId};
use vulcan::{
    ClauseRole, Formula, InductionMode, NoLimits, Problem, Prover, ProverConfig,
    SaturationOutcome,
};

/// Peano naturals with the recursive add definition.
struct NatSetup {
    prover: Prover,
    zero: FunctionId,
    succ: FunctionId,
    add: FunctionId,
}

impl NatSetup {
    fn new() -> Self {
        let mut config = ProverConfig::default();
        config.max_iterations = 50_000;
        config.induction = InductionMode::Structural;
        let mut prover = Prover::new(config);
        prover.set_limit_oracle(Box::new(NoLimits));

        let bank = prover.bank_mut();
        let nat = bank
            .signature
            .add_sort("nat", vulcan::fol::BuiltinSort::Individual);
        let zero = bank.signature.add_function("zero", &[], nat);
        let succ = bank.signature.add_function("succ", &[nat], nat);
        bank.signature.mark_constructor(zero);
        bank.signature.mark_constructor(succ);
        let add = bank.signature.add_function("add", &[nat, nat], nat);

        NatSetup {
            prover,
            zero,
            succ,
            add,
        }
    }

    fn zero(&mut self) -> TermId {
        let zero = self.zero;
        self.prover.bank_mut().constant(zero)
    }

    fn succ(&mut self, t: TermId) -> TermId {
        let succ = self.succ;
        self.prover.bank_mut().app(succ, vec![t])
    }

    fn add(&mut self, l: TermId, r: TermId) -> TermId {
        let add = self.add;
        self.prover.bank_mut().app(add, vec![l, r])
    }

    /// add(zero, Y) = Y and add(succ(X), Y) = succ(add(X, Y)) as formula
    /// units, so the induction preprocessor sees the definition.
    fn definition_units(&mut self, problem: &mut Problem) {
        let x = self.prover.bank_mut().var(0);
        let y = self.prover.bank_mut().var(1);
        let z = self.zero();

        let add_zy = self.add(z, y);
        let base = self.prover.bank_mut().equality(true, add_zy, y);

        let sx = self.succ(x);
        let add_sxy = self.add(sx, y);
        let add_xy = self.add(x, y);
        let s_add = self.succ(add_xy);
        let step = self.prover.bank_mut().equality(true, add_sxy, s_add);

        problem.add_formula("add_base", ClauseRole::Axiom, Formula::lit(base));
        problem.add_formula("add_step", ClauseRole::Axiom, Formula::lit(step));
    }
}

#[test]
fn test_ground_addition_goal() {
    // add(s(s(0)), s(0)) = s(s(s(0)))
    let mut setup = NatSetup::new();
    let mut problem = Problem::new();
    setup.definition_units(&mut problem);

    let z = setup.zero();
    let one = setup.succ(z);
    let two = setup.succ(one);
    let three = setup.succ(two);
    let sum = setup.add(two, one);
    let goal = setup.prover.bank_mut().equality(false, sum, three);
    problem.add_clause("goal", ClauseRole::NegatedConjecture, vec![goal]);

    let outcome = setup.prover.prove(problem);
    assert!(matches!(outcome, SaturationOutcome::Refutation { .. }));
}

#[test]
fn test_right_identity_needs_induction() {
    // add(sk, zero) = sk is not provable by rewriting alone; the
    // induction hypothesis over the first argument closes it
    let mut setup = NatSetup::new();
    let mut problem = Problem::new();
    setup.definition_units(&mut problem);

    // The skolemized negated conjecture of ![X]: add(X, zero) = X
    let (sk_term, z) = {
        let bank = setup.prover.bank_mut();
        let nat = bank
            .signature
            .add_sort("nat", vulcan::fol::BuiltinSort::Individual);
        let sk = bank.signature.add_skolem(&[], nat);
        let sk_term = bank.constant(sk);
        (sk_term, bank.constant(setup.zero))
    };
    let sum = setup.add(sk_term, z);
    let goal = setup.prover.bank_mut().equality(false, sum, sk_term);
    problem.add_clause("goal", ClauseRole::NegatedConjecture, vec![goal]);

    let outcome = setup.prover.prove(problem);
    assert!(matches!(outcome, SaturationOutcome::Refutation { .. }));
    assert!(setup.prover.statistics.induction_schemes >= 1);
    assert!(setup.prover.statistics.induction_applications >= 1);
}

#[test]
fn test_induction_disabled_leaves_goal_open() {
    // Without induction the right-identity goal saturates or hits the
    // iteration limit, but is not refuted
    let mut config = ProverConfig::default();
    config.max_iterations = 300;
    config.induction = InductionMode::Off;
    let mut prover = Prover::new(config);
    prover.set_limit_oracle(Box::new(NoLimits));

    let bank = prover.bank_mut();
    let nat = bank
        .signature
        .add_sort("nat", vulcan::fol::BuiltinSort::Individual);
    let zero = bank.signature.add_function("zero", &[], nat);
    let succ = bank.signature.add_function("succ", &[nat], nat);
    bank.signature.mark_constructor(zero);
    bank.signature.mark_constructor(succ);
    let add = bank.signature.add_function("add", &[nat, nat], nat);
    let sk = bank.signature.add_skolem(&[], nat);

    let x = bank.var(0);
    let y = bank.var(1);
    let z = bank.constant(zero);
    let add_zy = bank.app(add, vec![z, y]);
    let base = bank.equality(true, add_zy, y);
    let sx = bank.app(succ, vec![x]);
    let add_sxy = bank.app(add, vec![sx, y]);
    let add_xy = bank.app(add, vec![x, y]);
    let s_add = bank.app(succ, vec![add_xy]);
    let step = bank.equality(true, add_sxy, s_add);

    let sk_term = bank.constant(sk);
    let sum = bank.app(add, vec![sk_term, z]);
    let goal = bank.equality(false, sum, sk_term);

    let mut problem = Problem::new();
    problem.add_formula("base", ClauseRole::Axiom, Formula::lit(base));
    problem.add_formula("step", ClauseRole::Axiom, Formula::lit(step));
    problem.add_clause("goal", ClauseRole::NegatedConjecture, vec![goal]);

    let outcome = prover.prove(problem);
    assert!(!matches!(outcome, SaturationOutcome::Refutation { .. }));
}
