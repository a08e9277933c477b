//! End-to-end saturation runs on small problems

use vulcan::{
    ClauseRole, NoLimits, Problem, Prover, ProverConfig, SaturationOutcome, TerminationReason,
};

fn prover() -> Prover {
    let mut config = ProverConfig::default();
    config.max_iterations = 10_000;
    let mut prover = Prover::new(config);
    prover.set_limit_oracle(Box::new(NoLimits));
    prover
}

#[test]
fn test_unit_refutation() {
    // { p(a); ~p(a) } resolves to the empty clause; exit code 0
    let mut prover = prover();
    let bank = prover.bank_mut();
    let p = bank.signature.add_plain_predicate("p", 1);
    let a = bank.signature.add_plain_function("a", 0);
    let ca = bank.constant(a);
    let pa = bank.positive(p, vec![ca]);
    let npa = bank.negative(p, vec![ca]);

    let mut problem = Problem::new();
    problem.add_clause("axiom", ClauseRole::Axiom, vec![pa]);
    problem.add_clause("goal", ClauseRole::NegatedConjecture, vec![npa]);

    let outcome = prover.prove(problem);
    assert!(matches!(outcome, SaturationOutcome::Refutation { .. }));
    assert_eq!(outcome.exit_code(), 0);

    // The proof ends with the empty clause and lists both premises
    let proof = prover.proof_text().unwrap();
    let last = proof.lines().last().unwrap();
    assert!(last.contains("$false"));
    assert!(last.contains("resolution"));
}

#[test]
fn test_saturation_reports_exit_code_one() {
    let mut prover = prover();
    let bank = prover.bank_mut();
    let p = bank.signature.add_plain_predicate("p", 1);
    let a = bank.signature.add_plain_function("a", 0);
    let ca = bank.constant(a);
    let pa = bank.positive(p, vec![ca]);

    let mut problem = Problem::new();
    problem.add_clause("axiom", ClauseRole::Axiom, vec![pa]);

    let outcome = prover.prove(problem);
    assert_eq!(outcome, SaturationOutcome::Saturated);
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(prover.statistics.termination, TerminationReason::Saturated);
}

#[test]
fn test_propositional_chain() {
    // p, p -> q, q -> r, ~r
    let mut prover = prover();
    let bank = prover.bank_mut();
    let p = bank.signature.add_plain_predicate("p", 0);
    let q = bank.signature.add_plain_predicate("q", 0);
    let r = bank.signature.add_plain_predicate("r", 0);
    let lp = bank.positive(p, vec![]);
    let np = bank.negative(p, vec![]);
    let lq = bank.positive(q, vec![]);
    let nq = bank.negative(q, vec![]);
    let lr = bank.positive(r, vec![]);
    let nr = bank.negative(r, vec![]);

    let mut problem = Problem::new();
    problem.add_clause("c1", ClauseRole::Axiom, vec![lp]);
    problem.add_clause("c2", ClauseRole::Axiom, vec![np, lq]);
    problem.add_clause("c3", ClauseRole::Axiom, vec![nq, lr]);
    problem.add_clause("goal", ClauseRole::NegatedConjecture, vec![nr]);

    let outcome = prover.prove(problem);
    assert!(matches!(outcome, SaturationOutcome::Refutation { .. }));
}

#[test]
fn test_equality_reasoning() {
    // a = b, b = c |- a = c
    let mut prover = prover();
    let bank = prover.bank_mut();
    let a = bank.signature.add_plain_function("a", 0);
    let b = bank.signature.add_plain_function("b", 0);
    let c = bank.signature.add_plain_function("c", 0);
    let ca = bank.constant(a);
    let cb = bank.constant(b);
    let cc = bank.constant(c);

    let ab = bank.equality(true, ca, cb);
    let bc = bank.equality(true, cb, cc);
    let not_ac = bank.equality(false, ca, cc);

    let mut problem = Problem::new();
    problem.add_clause("ab", ClauseRole::Axiom, vec![ab]);
    problem.add_clause("bc", ClauseRole::Axiom, vec![bc]);
    problem.add_clause("goal", ClauseRole::NegatedConjecture, vec![not_ac]);

    let outcome = prover.prove(problem);
    assert!(matches!(outcome, SaturationOutcome::Refutation { .. }));
}

#[test]
fn test_ground_rewriting_chain() {
    // f(a) = b, g(b) = c, ~p(g(f(a))) , p(c)
    let mut prover = prover();
    let bank = prover.bank_mut();
    let p = bank.signature.add_plain_predicate("p", 1);
    let f = bank.signature.add_plain_function("f", 1);
    let g = bank.signature.add_plain_function("g", 1);
    let a = bank.signature.add_plain_function("a", 0);
    let b = bank.signature.add_plain_function("b", 0);
    let c = bank.signature.add_plain_function("c", 0);
    let ca = bank.constant(a);
    let cb = bank.constant(b);
    let cc = bank.constant(c);
    let fa = bank.app(f, vec![ca]);
    let gb = bank.app(g, vec![cb]);
    let gfa = bank.app(g, vec![fa]);

    let eq1 = bank.equality(true, fa, cb);
    let eq2 = bank.equality(true, gb, cc);
    let pc = bank.positive(p, vec![cc]);
    let goal = bank.negative(p, vec![gfa]);

    let mut problem = Problem::new();
    problem.add_clause("eq1", ClauseRole::Axiom, vec![eq1]);
    problem.add_clause("eq2", ClauseRole::Axiom, vec![eq2]);
    problem.add_clause("pc", ClauseRole::Axiom, vec![pc]);
    problem.add_clause("goal", ClauseRole::NegatedConjecture, vec![goal]);

    let outcome = prover.prove(problem);
    assert!(matches!(outcome, SaturationOutcome::Refutation { .. }));
}

#[test]
fn test_formula_input_is_clausified() {
    // ![X]: (p(X) => q(X)), p(a), ~q(a)
    let mut prover = prover();
    let bank = prover.bank_mut();
    let p = bank.signature.add_plain_predicate("p", 1);
    let q = bank.signature.add_plain_predicate("q", 1);
    let a = bank.signature.add_plain_function("a", 0);
    let ca = bank.constant(a);
    let x = bank.var(0);

    let px = bank.positive(p, vec![x]);
    let qx = bank.positive(q, vec![x]);
    let pa = bank.positive(p, vec![ca]);
    let nqa = bank.negative(q, vec![ca]);

    let implication = vulcan::Formula::implies(
        vulcan::Formula::lit(px),
        vulcan::Formula::lit(qx),
    );

    let mut problem = Problem::new();
    problem.add_formula("imp", ClauseRole::Axiom, implication);
    problem.add_clause("pa", ClauseRole::Axiom, vec![pa]);
    problem.add_clause("goal", ClauseRole::NegatedConjecture, vec![nqa]);

    let outcome = prover.prove(problem);
    assert!(matches!(outcome, SaturationOutcome::Refutation { .. }));
}
