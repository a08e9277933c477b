//! The given-clause saturation loop
//!
//! Each iteration pulls one clause from passive, forward-simplifies it,
//! optionally splits it, backward-simplifies the stored sets against it,
//! activates it, and runs every generating rule on it; conclusions enter
//! the unprocessed queue and flow to passive through forward
//! simplification. The loop polls the limit oracle between iterations and
//! around the arithmetic oracle; a limit hit completes the current
//! inference and exits with the termination reason set.

use super::rule::{Generated, GeneratingRule, RuleContext, Simplification, SimplifyingRule};
use super::splitting::components;
use super::state::SaturationState;
use crate::config::{LiteralSelectionStrategy, ProverConfig, SplittingMode};
use crate::fol::{Clause, ClauseRole, StoreState, TermBank, KBO};
use crate::generating::{
    ArithFactoringRule, EqualityFactoringRule, EqualityResolutionRule, FactoringRule,
    InequalityResolutionRule, ResolutionRule, SuperpositionRule,
};
use crate::induction::InductionRule;
use crate::limits::{LimitOracle, LimitStatus, WallClock};
use crate::oracle::{ArithOracle, OracleVerdict};
use crate::problem::{Problem, UnitContent};
use crate::proof::{Derivation, InferenceRule, ProofStore};
use crate::selection::{
    apply_selection, LiteralSelector, SelectAll, SelectMaximal,
    SelectUniqueMaximalOrNegOrMaximal,
};
use crate::simplifying::{DemodulationRule, SubsumptionRule, TautologyRule};
use crate::statistics::{Statistics, TerminationReason};
use tracing::debug;

/// Final verdict of a saturation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaturationOutcome {
    /// The empty clause was derived; the conjecture is proved.
    Refutation { empty_clause: usize },
    /// The clause set is saturated; the conjecture is counter-satisfiable.
    Saturated,
    /// The run stopped early (time, memory, iteration limit).
    Incomplete(TerminationReason),
}

impl SaturationOutcome {
    /// Process exit code of the run: 0 refutation, 1 saturation,
    /// 2 incomplete termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            SaturationOutcome::Refutation { .. } => 0,
            SaturationOutcome::Saturated => 1,
            SaturationOutcome::Incomplete(_) => 2,
        }
    }
}

enum ForwardOutcome {
    Kept,
    Deleted,
    Replaced,
}

/// The saturation prover: state, engines, statistics, and the loop.
pub struct Prover {
    pub config: ProverConfig,
    pub state: SaturationState,
    pub statistics: Statistics,
    kbo: KBO,
    generating: Vec<Box<dyn GeneratingRule>>,
    simplifying: Vec<Box<dyn SimplifyingRule>>,
    selector: Box<dyn LiteralSelector>,
    limit: Box<dyn LimitOracle>,
    oracle: Option<Box<dyn ArithOracle>>,
    empty_clause: Option<usize>,
}

impl Prover {
    pub fn new(config: ProverConfig) -> Self {
        let selector: Box<dyn LiteralSelector> = match config.literal_selection {
            LiteralSelectionStrategy::All => Box::new(SelectAll),
            LiteralSelectionStrategy::Maximal => Box::new(SelectMaximal),
            LiteralSelectionStrategy::UniqueMaximalOrNegOrMaximal => {
                Box::new(SelectUniqueMaximalOrNegOrMaximal)
            }
        };
        let limit: Box<dyn LimitOracle> = Box::new(WallClock::new(config.timeout));
        Prover {
            state: SaturationState::new(TermBank::new(), config.age_weight_ratio),
            statistics: Statistics::new(),
            kbo: KBO::default(),
            generating: Vec::new(),
            simplifying: Vec::new(),
            selector,
            limit,
            oracle: None,
            empty_clause: None,
            config,
        }
    }

    /// The bank used to intern problem terms before `prove`.
    pub fn bank_mut(&mut self) -> &mut TermBank {
        &mut self.state.bank
    }

    pub fn bank(&self) -> &TermBank {
        &self.state.bank
    }

    /// Attach an external arithmetic oracle.
    pub fn set_oracle(&mut self, oracle: Box<dyn ArithOracle>) {
        self.oracle = Some(oracle);
    }

    /// Replace the limit oracle (tests use `NoLimits`).
    pub fn set_limit_oracle(&mut self, limit: Box<dyn LimitOracle>) {
        self.limit = limit;
    }

    /// Run the full pipeline: intake, engine setup, saturation.
    pub fn prove(&mut self, problem: Problem) -> SaturationOutcome {
        self.intake(problem);
        self.build_rules();
        self.run()
    }

    /// Clausify formula units, discover induction templates, and queue
    /// every input clause.
    fn intake(&mut self, problem: Problem) {
        let mut clausifier = crate::fol::Clausifier::new();
        let mut formulas = Vec::new();
        for unit in problem.units {
            match unit.content {
                UnitContent::Clause(literals) => {
                    let clause = Clause::input(literals, unit.role, &self.state.bank);
                    self.state.add_clause(clause);
                }
                UnitContent::Formula(formula) => {
                    formulas.push((formula.clone(), unit.role));
                    let clauses =
                        clausifier.clausify(formula, unit.role, &mut self.state.bank);
                    for mut clause in clauses {
                        clause.derivation = Derivation::new(InferenceRule::Clausification, vec![]);
                        self.state.add_clause(clause);
                    }
                }
            }
        }
        if self.config.induction.enabled() {
            let templates = crate::induction::discover_templates(
                &formulas,
                &mut self.state.bank,
                self.config.show_induction,
            );
            self.generating.push(Box::new(InductionRule::new(
                templates,
                crate::induction::InductionSettings {
                    mode: self.config.induction,
                    on_complex_terms: self.config.induction_on_complex_terms,
                    strengthen: self.config.induction_strengthen,
                    multiclause: self.config.induction_multiclause,
                    show: self.config.show_induction,
                },
            )));
        }
    }

    fn build_rules(&mut self) {
        self.generating.push(Box::new(ResolutionRule::new()));
        self.generating.push(Box::new(FactoringRule::new()));
        self.generating.push(Box::new(SuperpositionRule::new()));
        self.generating.push(Box::new(EqualityResolutionRule::new()));
        self.generating.push(Box::new(EqualityFactoringRule::new()));
        self.generating
            .push(Box::new(InequalityResolutionRule::new()));
        self.generating.push(Box::new(ArithFactoringRule::new()));

        self.simplifying.push(Box::new(TautologyRule::new()));
        self.simplifying.push(Box::new(DemodulationRule::new()));
        self.simplifying.push(Box::new(SubsumptionRule::new(
            self.config.subsumption_resolution,
        )));
    }

    /// The given-clause loop.
    fn run(&mut self) -> SaturationOutcome {
        loop {
            match self.limit.check() {
                LimitStatus::Within => {}
                LimitStatus::TimeLimit => {
                    self.statistics.termination = TerminationReason::TimeLimit;
                    return SaturationOutcome::Incomplete(TerminationReason::TimeLimit);
                }
                LimitStatus::MemoryLimit => {
                    self.statistics.termination = TerminationReason::MemoryLimit;
                    return SaturationOutcome::Incomplete(TerminationReason::MemoryLimit);
                }
            }

            self.process_unprocessed();
            if let Some(empty) = self.empty_clause {
                self.statistics.termination = TerminationReason::Refutation;
                return SaturationOutcome::Refutation {
                    empty_clause: empty,
                };
            }

            let given = match self.state.select_given() {
                Some(idx) => idx,
                None => {
                    if self.state.is_exhausted() {
                        self.statistics.termination = TerminationReason::Saturated;
                        return SaturationOutcome::Saturated;
                    }
                    continue;
                }
            };

            self.statistics.iterations += 1;
            if self.config.max_iterations != 0
                && self.statistics.iterations > self.config.max_iterations
            {
                self.statistics.termination = TerminationReason::IterationLimit;
                return SaturationOutcome::Incomplete(TerminationReason::IterationLimit);
            }

            // Weight/age limit flags: discarded, but not redundant
            if let Some(limit) = self.config.weight_limit {
                if self.state.clauses[given].weight > limit {
                    self.state.delete(given);
                    self.statistics.discarded_nonredundant += 1;
                    continue;
                }
            }

            // Forward simplification of the given clause
            match self.forward_simplify(given) {
                ForwardOutcome::Deleted | ForwardOutcome::Replaced => continue,
                ForwardOutcome::Kept => {}
            }
            if self.empty_clause.is_some() {
                continue;
            }

            // Splitting into variable-disjoint components
            if self.try_split(given) {
                continue;
            }

            // Literal selection before activation: the indexes record the
            // selected prefix
            {
                let clause = &mut self.state.clauses[given];
                apply_selection(clause, self.selector.as_ref(), &self.state.bank, &self.kbo);
            }

            // Backward simplification against the new clause
            self.backward_simplify(given);

            // Ground arithmetic conjunctions go to the external oracle
            self.consult_oracle(given);
            if self.empty_clause.is_some() {
                continue;
            }

            self.state.activate(given);
            self.statistics.activations += 1;
            if self.config.show_active {
                debug!(clause = given, "active: {}", self.state.clauses[given].display(&self.state.bank));
            }

            // Generating inferences of the given clause against the
            // active set
            let mut produced: Vec<Generated> = Vec::new();
            let rename_offset = self.state.rename_offset();
            for rule in &mut self.generating {
                let mut ctx = RuleContext {
                    clauses: &self.state.clauses,
                    indexes: &self.state.indexes,
                    bank: &mut self.state.bank,
                    kbo: &self.kbo,
                    rename_offset,
                };
                produced.extend(rule.generate(given, &mut ctx));
                rule.record_statistics(&mut self.statistics);
            }
            for generated in produced {
                self.insert_generated(generated);
            }
        }
    }

    /// Drain the unprocessed queue into passive through immediate and
    /// forward simplification.
    fn process_unprocessed(&mut self) {
        while let Some(idx) = self.state.unprocessed.pop_front() {
            if self.state.clauses[idx].store != StoreState::Unprocessed {
                continue;
            }
            if self.state.clauses[idx].is_empty() {
                self.record_empty(idx);
                return;
            }

            // Immediate simplification: duplicate literal removal
            {
                let (clauses, bank) = (&mut self.state.clauses, &self.state.bank);
                if clauses[idx].remove_duplicate_literals(bank) {
                    self.statistics.duplicate_literals_removed += 1;
                }
            }

            match self.forward_simplify(idx) {
                ForwardOutcome::Deleted | ForwardOutcome::Replaced => continue,
                ForwardOutcome::Kept => {}
            }
            if self.empty_clause.is_some() {
                return;
            }

            // Variant of something already stored: redundant
            let is_variant = {
                let clause = &self.state.clauses[idx];
                self.state
                    .variants
                    .find_variant(&clause.literals, &self.state.bank)
                    .is_some()
            };
            if is_variant {
                self.state.delete(idx);
                continue;
            }

            self.state.admit_to_passive(idx);
            self.statistics.passive_added += 1;
            if self.config.show_passive {
                debug!(clause = idx, "passive: {}", self.state.clauses[idx].display(&self.state.bank));
            }
        }
    }

    /// Run every simplifier forward on the target. A replacement is
    /// re-queued as unprocessed.
    fn forward_simplify(&mut self, target: usize) -> ForwardOutcome {
        for i in 0..self.simplifying.len() {
            let found = {
                let rename_offset = self.state.rename_offset();
                let mut ctx = RuleContext {
                    clauses: &self.state.clauses,
                    indexes: &self.state.indexes,
                    bank: &mut self.state.bank,
                    kbo: &self.kbo,
                    rename_offset,
                };
                self.simplifying[i].simplify_forward(target, &mut ctx)
            };
            let simplification = match found {
                Some(s) => s,
                None => continue,
            };
            let rule_name = self.simplifying[i].name();
            match simplification {
                Simplification::Delete { .. } => {
                    self.state.delete(target);
                    match rule_name {
                        "subsumption" => self.statistics.forward_subsumed += 1,
                        "tautology_deletion" => self.statistics.tautologies_deleted += 1,
                        _ => {}
                    }
                    return ForwardOutcome::Deleted;
                }
                Simplification::Replace {
                    literals,
                    rule: inference,
                    premises,
                    rewrite,
                    ..
                } => {
                    match rule_name {
                        "subsumption" => self.statistics.subsumption_resolutions += 1,
                        "demodulation" => self.statistics.forward_demodulations += 1,
                        _ => {}
                    }
                    let age = self.state.clauses[target].age;
                    let depth = self.state.clauses[target].induction_depth;
                    self.state.delete(target);
                    let mut derivation = Derivation::new(inference, premises);
                    if let Some((from, to)) = rewrite {
                        derivation.rewrite = Some(crate::proof::RewriteInfo { from, to });
                    }
                    let mut clause =
                        Clause::derived(literals, derivation, age, &self.state.bank);
                    clause.induction_depth = depth;
                    self.enqueue(clause);
                    return ForwardOutcome::Replaced;
                }
            }
        }
        ForwardOutcome::Kept
    }

    /// Run every simplifier backward with the given clause as the side
    /// premise.
    fn backward_simplify(&mut self, given: usize) {
        let mut simplifications = Vec::new();
        let rename_offset = self.state.rename_offset();
        for rule in &mut self.simplifying {
            let mut ctx = RuleContext {
                clauses: &self.state.clauses,
                indexes: &self.state.indexes,
                bank: &mut self.state.bank,
                kbo: &self.kbo,
                rename_offset,
            };
            let results = rule.simplify_backward(given, &mut ctx);
            let rule_name = rule.name();
            for simp in results {
                simplifications.push((rule_name, simp));
            }
        }
        for (rule_name, simplification) in simplifications {
            match simplification {
                Simplification::Delete { target, .. } => {
                    if self.state.clauses[target].store == StoreState::None {
                        continue;
                    }
                    self.state.delete(target);
                    if rule_name == "subsumption" {
                        self.statistics.backward_subsumed += 1;
                    }
                }
                Simplification::Replace {
                    target,
                    literals,
                    rule: inference,
                    premises,
                    rewrite,
                } => {
                    if self.state.clauses[target].store == StoreState::None {
                        continue;
                    }
                    if rule_name == "demodulation" {
                        self.statistics.backward_demodulations += 1;
                    }
                    let age = self.state.clauses[target].age;
                    let depth = self.state.clauses[target].induction_depth;
                    self.state.delete(target);
                    let mut derivation = Derivation::new(inference, premises);
                    if let Some((from, to)) = rewrite {
                        derivation.rewrite = Some(crate::proof::RewriteInfo { from, to });
                    }
                    let mut clause =
                        Clause::derived(literals, derivation, age, &self.state.bank);
                    clause.induction_depth = depth;
                    self.enqueue(clause);
                }
            }
        }
    }

    /// Split the given clause into components if enabled and profitable.
    /// Returns true when the clause was split (and consumed).
    fn try_split(&mut self, given: usize) -> bool {
        let applicable = match self.config.splitting {
            SplittingMode::Off => false,
            SplittingMode::InputOnly => self.state.clauses[given].role != ClauseRole::Derived,
            SplittingMode::On => true,
        };
        if !applicable {
            return false;
        }
        let parts = components(&self.state.clauses[given].literals, &self.state.bank);
        if parts.len() <= 1 {
            return false;
        }

        let age = self.state.clauses[given].age;
        let depth = self.state.clauses[given].induction_depth;
        self.state.delete(given);
        for part in parts {
            self.statistics.split_components += 1;
            // A component variant that is already active is reactivated so
            // its inferences rerun against the newer active set
            let existing = self.state.variants.find_variant(&part, &self.state.bank);
            if let Some(idx) = existing {
                if self.state.clauses[idx].store == StoreState::Active {
                    self.state.reactivate(idx);
                    self.statistics.reactivations += 1;
                }
                continue;
            }
            let mut clause = Clause::derived(
                part,
                Derivation::new(InferenceRule::Splitting, vec![given]),
                age,
                &self.state.bank,
            );
            clause.induction_depth = depth;
            self.enqueue(clause);
        }
        true
    }

    /// Consult the arithmetic oracle on a ground, fully interpreted given
    /// clause. `Unsat` yields the refutation; `Unknown` is ignored.
    fn consult_oracle(&mut self, given: usize) {
        let oracle = match self.oracle.as_mut() {
            Some(o) => o,
            None => return,
        };
        let literals = self.state.clauses[given].literals.clone();
        let all_arith = !literals.is_empty()
            && literals.iter().all(|&lit| {
                self.state.bank.literal_is_ground(lit)
                    && self
                        .state
                        .bank
                        .signature
                        .arith_predicate(self.state.bank.literal_predicate(lit))
                        .is_some()
            });
        if !all_arith {
            return;
        }
        // Oracle calls bracket a suspension point
        if self.limit.check() != LimitStatus::Within {
            return;
        }
        let verdict = oracle.decide(&literals, false, &self.state.bank);
        let _ = self.limit.check();
        if let OracleVerdict::Unsat { .. } = verdict {
            let clause = Clause::derived(
                vec![],
                Derivation::new(InferenceRule::ArithmeticRefutation, vec![given]),
                self.state.clauses[given].age + 1,
                &self.state.bank,
            );
            self.enqueue(clause);
        }
    }

    /// Admit a generated conclusion: weight limit, induction depth bound,
    /// then the unprocessed queue.
    fn insert_generated(&mut self, generated: Generated) {
        self.statistics.generated += 1;

        let age = generated
            .premises
            .iter()
            .map(|&p| self.state.clauses[p].age)
            .max()
            .unwrap_or(0)
            + 1;
        let mut depth = generated
            .premises
            .iter()
            .map(|&p| self.state.clauses[p].induction_depth)
            .max()
            .unwrap_or(0);
        if generated.rule == InferenceRule::Induction {
            depth += 1;
            if depth > self.config.max_induction_depth {
                return;
            }
            self.statistics.induction_applications += 1;
        }

        let mut derivation = Derivation::new(generated.rule, generated.premises);
        if let Some((from, to)) = generated.rewrite {
            derivation.rewrite = Some(crate::proof::RewriteInfo { from, to });
        }
        let mut clause = Clause::derived(generated.literals, derivation, age, &self.state.bank);
        clause.induction_depth = depth;

        if let Some(limit) = self.config.weight_limit {
            if clause.weight > limit && !clause.is_empty() {
                self.statistics.discarded_nonredundant += 1;
                return;
            }
        }

        self.enqueue(clause);
    }

    /// Put a new clause into the arena and the unprocessed queue,
    /// catching the empty clause.
    fn enqueue(&mut self, clause: Clause) {
        let empty = clause.is_empty();
        let idx = self.state.add_clause(clause);
        if self.config.show_new {
            debug!(clause = idx, "new: {}", self.state.clauses[idx].display(&self.state.bank));
        }
        if empty {
            self.record_empty(idx);
        }
    }

    fn record_empty(&mut self, idx: usize) {
        if self.empty_clause.is_none() {
            self.empty_clause = Some(idx);
        }
    }

    /// Text rendering of the refutation, if one was found.
    pub fn proof_text(&self) -> Option<String> {
        let empty = self.empty_clause?;
        let store = ProofStore::new(&self.state.clauses);
        Some(store.write_proof(empty, &self.state.bank))
    }

    pub fn empty_clause(&self) -> Option<usize> {
        self.empty_clause
    }
}
