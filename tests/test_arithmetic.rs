//! Integer inequality reasoning through the saturation loop

use vulcan::fol::TermId;
use vulcan::{ClauseRole, NoLimits, Problem, Prover, ProverConfig, SaturationOutcome};

struct ArithSetup {
    prover: Prover,
    arith: vulcan::fol::ArithSymbols,
}

impl ArithSetup {
    fn new() -> Self {
        let mut config = ProverConfig::default();
        config.max_iterations = 10_000;
        Self::with_config(config)
    }

    fn with_config(config: ProverConfig) -> Self {
        let mut prover = Prover::new(config);
        prover.set_limit_oracle(Box::new(NoLimits));
        let arith = prover.bank_mut().signature.interpret_arithmetic();
        ArithSetup { prover, arith }
    }

    fn int_const(&mut self, name: &str) -> TermId {
        let bank = self.prover.bank_mut();
        let int = bank.signature.integer_sort();
        let id = bank.signature.add_function(name, &[], int);
        bank.constant(id)
    }

    fn num(&mut self, value: i32) -> TermId {
        let bank = self.prover.bank_mut();
        let id = bank.signature.numeral(value);
        bank.constant(id)
    }

    fn gt_zero(&mut self, lhs: TermId) -> vulcan::LiteralId {
        let zero = self.num(0);
        self.prover
            .bank_mut()
            .positive(self.arith.greater, vec![lhs, zero])
    }
}

#[test]
fn test_inequality_resolution_derives_resolvent() {
    // 2·f(a) > 0 and -f(a) + b > 0 resolve to 2·b > 0
    let mut setup = ArithSetup::new();
    let a = setup.int_const("a");
    let b = setup.int_const("b");
    let arith = setup.arith;

    let (lit1, lit2, expected) = {
        let fa = {
            let bank = setup.prover.bank_mut();
            let int = bank.signature.integer_sort();
            let f = bank.signature.add_function("f", &[int], int);
            bank.app(f, vec![a])
        };
        let two = setup.num(2);
        let two_fa = setup.prover.bank_mut().app(arith.product, vec![two, fa]);
        let lit1 = setup.gt_zero(two_fa);

        let minus_fa = setup.prover.bank_mut().app(arith.uminus, vec![fa]);
        let sum = setup.prover.bank_mut().app(arith.sum, vec![minus_fa, b]);
        let lit2 = setup.gt_zero(sum);

        let two = setup.num(2);
        let two_b = setup.prover.bank_mut().app(arith.product, vec![two, b]);
        let expected = setup.gt_zero(two_b);
        (lit1, lit2, expected)
    };

    let mut problem = Problem::new();
    problem.add_clause("ineq1", ClauseRole::Axiom, vec![lit1]);
    problem.add_clause("ineq2", ClauseRole::Axiom, vec![lit2]);

    let outcome = setup.prover.prove(problem);
    assert_eq!(outcome, SaturationOutcome::Saturated);
    assert_eq!(setup.prover.statistics.arith_overflow_skips, 0);

    // The resolvent 2·b > 0 was produced
    let found = setup
        .prover
        .state
        .clauses
        .iter()
        .any(|clause| clause.literals == vec![expected]);
    assert!(found, "expected the resolvent 2·b > 0");
}

#[test]
fn test_overflow_is_skipped_and_counted() {
    // 2·(2^30·a + 2^29) > 0 and -2·(2^30·a + 2^29) > 0: the combination
    // overflows the coefficient type, so no resolvent is emitted and the
    // skip is counted
    let mut setup = ArithSetup::new();
    let a = setup.int_const("a");
    let arith = setup.arith;

    let (lit1, lit2) = {
        let big = setup.num(1 << 30);
        let half = setup.num(1 << 29);
        let two = setup.num(2);

        let big_a = setup.prover.bank_mut().app(arith.product, vec![big, a]);
        let inner = setup.prover.bank_mut().app(arith.sum, vec![big_a, half]);
        let lhs1 = setup.prover.bank_mut().app(arith.product, vec![two, inner]);
        let lit1 = setup.gt_zero(lhs1);

        let minus = setup.prover.bank_mut().app(arith.uminus, vec![inner]);
        let lhs2 = setup.prover.bank_mut().app(arith.product, vec![two, minus]);
        let lit2 = setup.gt_zero(lhs2);
        (lit1, lit2)
    };

    let mut problem = Problem::new();
    problem.add_clause("big1", ClauseRole::Axiom, vec![lit1]);
    problem.add_clause("big2", ClauseRole::Axiom, vec![lit2]);

    let outcome = setup.prover.prove(problem);
    assert_eq!(outcome, SaturationOutcome::Saturated);
    assert!(setup.prover.statistics.arith_overflow_skips > 0);

    // No clause beyond the two inputs was kept
    let derived = setup
        .prover
        .state
        .clauses
        .iter()
        .filter(|c| c.role == ClauseRole::Derived)
        .count();
    assert_eq!(derived, 0);
}

#[test]
fn test_proportional_inequalities_factor_in_loop() {
    // a > 0 | 3·a > 0 collapses by arithmetic literal factoring
    // (select-all keeps both literals eligible)
    let mut config = ProverConfig::default();
    config.max_iterations = 10_000;
    config.literal_selection = vulcan::LiteralSelectionStrategy::All;
    let mut setup = ArithSetup::with_config(config);
    let a = setup.int_const("a");
    let arith = setup.arith;

    let lit1 = setup.gt_zero(a);
    let three = setup.num(3);
    let three_a = setup.prover.bank_mut().app(arith.product, vec![three, a]);
    let lit2 = setup.gt_zero(three_a);

    let mut problem = Problem::new();
    problem.add_clause("disj", ClauseRole::Axiom, vec![lit1, lit2]);

    let outcome = setup.prover.prove(problem);
    assert_eq!(outcome, SaturationOutcome::Saturated);
    let factored = setup
        .prover
        .state
        .clauses
        .iter()
        .any(|clause| clause.literals == vec![lit1]);
    assert!(factored, "expected the factored unit a > 0");
}
