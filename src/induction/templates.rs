//! Induction templates from recursive definitions
//!
//! Definition discovery scans input formulas for equational and
//! equivalence axioms whose left side is a *header*: a non-constructor
//! functor applied to constructor/variable arguments. Each such axiom
//! contributes one r-description (guard conditions, recursive-call
//! argument tuples, step argument tuple) to the template of its defined
//! symbol.
//!
//! Validation rejects templates that are not well-founded (no argument
//! order decreases under the subterm relation across all recursive calls)
//! and synthesizes trivially missing constructor cases before the
//! well-definedness verdict.

use crate::fol::{ClauseRole, Formula, FunctionId, PredicateId, TermBank, TermData, TermId};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// A defined symbol: functions and predicates keep separate templates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DefinedSymbol {
    Function(FunctionId),
    Predicate(PredicateId),
}

/// One case of a recursive definition.
#[derive(Debug, Clone)]
pub struct RDescription {
    /// Guard conditions accumulated from enclosing implications
    pub conditions: Vec<Formula>,
    /// Argument tuples of the recursive calls in the body
    pub recursive_calls: Vec<Vec<TermId>>,
    /// Argument tuple of the step case (the header's arguments)
    pub step_args: Vec<TermId>,
}

/// How a recursive-call argument relates to the step argument at the same
/// position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum VarType {
    Fixed,
    Subterm,
    Other,
}

/// The induction template of one defined symbol.
#[derive(Debug, Clone)]
pub struct InductionTemplate {
    pub rdescs: Vec<RDescription>,
    /// Positions designated as induction variables
    pub induction_positions: Vec<bool>,
    /// Well-founded order on position groups, outermost first
    pub order: Vec<BTreeSet<usize>>,
}

impl InductionTemplate {
    fn new() -> Self {
        InductionTemplate {
            rdescs: Vec::new(),
            induction_positions: Vec::new(),
            order: Vec::new(),
        }
    }

    fn arity(&self) -> usize {
        self.rdescs.first().map_or(0, |r| r.step_args.len())
    }

    /// Per-recursive-call relation vectors plus candidate positions.
    fn relations(&self, bank: &TermBank) -> (Vec<Vec<VarType>>, BTreeSet<usize>) {
        let arity = self.arity();
        let mut relations = Vec::new();
        let mut candidates = BTreeSet::new();
        for rdesc in &self.rdescs {
            for call in &rdesc.recursive_calls {
                let mut relation = vec![VarType::Other; arity];
                for i in 0..arity {
                    let call_arg = call[i];
                    let step_arg = rdesc.step_args[i];
                    if call_arg == step_arg {
                        relation[i] = VarType::Fixed;
                    } else if bank.is_strict_subterm(call_arg, step_arg) {
                        relation[i] = VarType::Subterm;
                        candidates.insert(i);
                    } else {
                        candidates.insert(i);
                    }
                }
                relations.push(relation);
            }
        }
        (relations, candidates)
    }

    /// Check well-foundedness: find a partition of argument positions into
    /// groups such that within each group all relations agree, and some
    /// group strictly decreases in every recursive call.
    pub fn check_well_foundedness(&mut self, bank: &TermBank) -> bool {
        if self.rdescs.is_empty() {
            return true;
        }
        let arity = self.arity();
        let (relations, candidates) = self.relations(bank);
        self.induction_positions = vec![false; arity];
        for relation in &relations {
            for (i, kind) in relation.iter().enumerate() {
                if *kind == VarType::Subterm {
                    self.induction_positions[i] = true;
                }
            }
        }
        self.order.clear();
        find_var_order(&relations, &candidates, &mut self.order)
    }

    /// Depth-one well-definedness: every constructor of a scrutinized
    /// position's sort must be covered by some unconditional case or a
    /// variable pattern. Missing constructors are synthesized as trivial
    /// base cases. Returns false only when a gap cannot be synthesized.
    pub fn check_well_definedness(
        &mut self,
        symbol: DefinedSymbol,
        bank: &mut TermBank,
        fresh_var: &mut u32,
    ) -> bool {
        let arity = self.arity();
        for pos in 0..arity {
            let scrutinized = self
                .rdescs
                .iter()
                .any(|r| !bank.is_var(r.step_args[pos]));
            if !scrutinized {
                continue;
            }
            // A variable pattern at this position covers every value
            let has_catch_all = self
                .rdescs
                .iter()
                .any(|r| r.conditions.is_empty() && bank.is_var(r.step_args[pos]));
            if has_catch_all {
                continue;
            }

            let sort = position_sort(symbol, pos, bank);
            let constructors: Vec<FunctionId> = (0..bank.signature.function_count() as u32)
                .map(FunctionId)
                .filter(|&f| {
                    bank.signature.is_constructor(f)
                        && bank.signature.function_result_sort(f) == sort
                })
                .collect();
            if constructors.is_empty() {
                // No constructor information for the sort; accept as is
                continue;
            }

            let covered: Vec<FunctionId> = self
                .rdescs
                .iter()
                .filter(|r| r.conditions.is_empty())
                .filter_map(|r| bank.functor(r.step_args[pos]))
                .collect();
            for missing in constructors {
                if covered.contains(&missing) {
                    continue;
                }
                // Synthesize the trivial case: fresh variables everywhere,
                // the missing constructor pattern at `pos`
                let mut step_args = Vec::with_capacity(arity);
                for i in 0..arity {
                    if i == pos {
                        let ctor_arity = bank.signature.function_arity(missing);
                        let mut ctor_args = Vec::with_capacity(ctor_arity as usize);
                        for _ in 0..ctor_arity {
                            ctor_args.push(bank.var(*fresh_var));
                            *fresh_var += 1;
                        }
                        step_args.push(bank.app(missing, ctor_args));
                    } else {
                        step_args.push(bank.var(*fresh_var));
                        *fresh_var += 1;
                    }
                }
                debug!(?symbol, "synthesizing missing induction case");
                self.rdescs.push(RDescription {
                    conditions: Vec::new(),
                    recursive_calls: Vec::new(),
                    step_args,
                });
            }
        }
        true
    }

    /// Discard templates with no recursive call or no structured argument.
    pub fn check_usefulness(&self, bank: &TermBank) -> bool {
        let mut has_recursion = false;
        let mut has_structure = false;
        for rdesc in &self.rdescs {
            if !rdesc.recursive_calls.is_empty() {
                has_recursion = true;
            }
            if rdesc.step_args.iter().any(|&arg| !bank.is_var(arg)) {
                has_structure = true;
            }
        }
        has_recursion && has_structure
    }
}

fn position_sort(symbol: DefinedSymbol, pos: usize, bank: &TermBank) -> crate::fol::SortId {
    match symbol {
        DefinedSymbol::Function(f) => bank.signature.function_arg_sorts(f)[pos],
        DefinedSymbol::Predicate(p) => bank.signature.predicate_arg_sorts(p)[pos],
    }
}

/// The recursive partition-and-order search: split candidate positions
/// into groups that change together, pick a group that strictly decreases
/// in the remaining relations, recurse on the relations where it stays
/// fixed.
fn find_var_order(
    relations: &[Vec<VarType>],
    candidates: &BTreeSet<usize>,
    result: &mut Vec<BTreeSet<usize>>,
) -> bool {
    if relations.is_empty() {
        return true;
    }
    if candidates.is_empty() {
        return false;
    }
    // Split candidates into sets that behave uniformly in every relation
    let mut candidate_sets: Vec<BTreeSet<usize>> = vec![candidates.clone()];
    for relation in relations {
        let mut subterm = BTreeSet::new();
        let mut fixed = BTreeSet::new();
        for (i, kind) in relation.iter().enumerate() {
            match kind {
                VarType::Fixed => {
                    fixed.insert(i);
                }
                VarType::Subterm => {
                    subterm.insert(i);
                }
                VarType::Other => {}
            }
        }
        let mut next = Vec::new();
        for set in &candidate_sets {
            let sti: BTreeSet<usize> = set.intersection(&subterm).copied().collect();
            let fi: BTreeSet<usize> = set.intersection(&fixed).copied().collect();
            if !sti.is_empty() {
                next.push(sti);
            }
            if !fi.is_empty() {
                next.push(fi);
            }
        }
        candidate_sets = next;
    }

    for set in &candidate_sets {
        let pivot = *set.iter().next().expect("candidate sets are nonempty");
        // Relations where the chosen group is fixed remain to be ordered
        let remaining: Vec<Vec<VarType>> = relations
            .iter()
            .filter(|r| r[pivot] == VarType::Fixed)
            .cloned()
            .collect();
        // The group must decrease in the relations it discharges
        if remaining.len() == relations.len() {
            continue;
        }
        let rest: BTreeSet<usize> = candidates.difference(set).copied().collect();
        let mut attempt = result.clone();
        attempt.push(set.clone());
        if find_var_order(&remaining, &rest, &mut attempt) {
            *result = attempt;
            return true;
        }
    }
    false
}

/// Is the term built from constructors and variables only?
pub fn is_constructor_term(t: TermId, bank: &TermBank) -> bool {
    match bank.term_data(t) {
        TermData::Var(_) => true,
        TermData::App { functor, args } => {
            bank.signature.is_constructor(*functor)
                && args.iter().all(|&arg| is_constructor_term(arg, bank))
        }
    }
}

/// Is the term a definition header: a non-constructor functor applied to
/// constructor/variable arguments?
pub fn is_header(t: TermId, bank: &TermBank) -> bool {
    match bank.term_data(t) {
        TermData::Var(_) => false,
        TermData::App { functor, args } => {
            !bank.signature.is_constructor(*functor)
                && args.iter().all(|&arg| is_constructor_term(arg, bank))
        }
    }
}

/// Collect the argument tuples of recursive calls to `f` inside a term.
fn collect_recursive_calls(body: TermId, f: FunctionId, bank: &TermBank, out: &mut Vec<Vec<TermId>>) {
    if let TermData::App { functor, args } = bank.term_data(body) {
        if *functor == f {
            out.push(args.clone());
        }
        for &arg in args {
            collect_recursive_calls(arg, f, bank, out);
        }
    }
}

/// Collect recursive calls to predicate `p` inside a formula body.
fn collect_predicate_calls(
    body: &Formula,
    p: PredicateId,
    bank: &TermBank,
    out: &mut Vec<Vec<TermId>>,
) {
    match body {
        Formula::Literal(lit) => {
            if bank.literal_predicate(*lit) == p {
                out.push(bank.literal_args(*lit).to_vec());
            }
        }
        Formula::Not(f) => collect_predicate_calls(f, p, bank, out),
        Formula::And(fs) | Formula::Or(fs) => {
            for f in fs {
                collect_predicate_calls(f, p, bank, out);
            }
        }
        Formula::Implies(a, b) | Formula::Iff(a, b) => {
            collect_predicate_calls(a, p, bank, out);
            collect_predicate_calls(b, p, bank, out);
        }
        Formula::Forall(_, f) | Formula::Exists(_, f) => {
            collect_predicate_calls(f, p, bank, out)
        }
    }
}

/// The discovered templates of a problem, keyed by defined symbol.
#[derive(Debug, Default)]
pub struct InductionTemplates {
    map: HashMap<DefinedSymbol, InductionTemplate>,
}

impl InductionTemplates {
    pub fn new() -> Self {
        InductionTemplates::default()
    }

    pub fn get(&self, symbol: DefinedSymbol) -> Option<&InductionTemplate> {
        self.map.get(&symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

/// Scan formula units for recursive definitions and build validated
/// templates.
pub fn discover_templates(
    formulas: &[(Formula, ClauseRole)],
    bank: &mut TermBank,
    show: bool,
) -> InductionTemplates {
    let mut collected: HashMap<DefinedSymbol, InductionTemplate> = HashMap::new();
    for (formula, role) in formulas {
        if *role == ClauseRole::NegatedConjecture {
            continue;
        }
        walk_formula(formula, &mut Vec::new(), bank, &mut collected);
    }

    let mut templates = InductionTemplates::new();
    let mut fresh_var = 1_000_000;
    for (symbol, mut template) in collected {
        if !template.check_well_foundedness(bank) {
            if show {
                debug!(?symbol, "discarding non-well-founded induction template");
            }
            continue;
        }
        if !template.check_well_definedness(symbol, bank, &mut fresh_var) {
            if show {
                debug!(?symbol, "discarding non-well-defined induction template");
            }
            continue;
        }
        if !template.check_usefulness(bank) {
            continue;
        }
        // Synthesized cases may change the relation picture; re-validate
        if !template.check_well_foundedness(bank) {
            continue;
        }
        if show {
            debug!(
                ?symbol,
                cases = template.rdescs.len(),
                "discovered induction template"
            );
        }
        templates.map.insert(symbol, template);
    }
    templates
}

fn walk_formula(
    formula: &Formula,
    conditions: &mut Vec<Formula>,
    bank: &TermBank,
    out: &mut HashMap<DefinedSymbol, InductionTemplate>,
) {
    match formula {
        Formula::Literal(lit) => {
            if bank.is_equality(*lit) && bank.literal_polarity(*lit) {
                let args = bank.literal_args(*lit).to_vec();
                try_function_definition(args[0], args[1], conditions, bank, out);
                try_function_definition(args[1], args[0], conditions, bank, out);
            } else if !bank.is_equality(*lit) {
                // A bare predicate header is a (base) case of a predicate
                // definition
                let args = bank.literal_args(*lit).to_vec();
                if args.iter().all(|&a| is_constructor_term(a, bank)) && !args.is_empty() {
                    out.entry(DefinedSymbol::Predicate(bank.literal_predicate(*lit)))
                        .or_insert_with(InductionTemplate::new)
                        .rdescs
                        .push(RDescription {
                            conditions: conditions.to_vec(),
                            recursive_calls: Vec::new(),
                            step_args: args,
                        });
                }
            }
        }
        Formula::And(fs) => {
            for f in fs {
                walk_formula(f, conditions, bank, out);
            }
        }
        Formula::Implies(lhs, rhs) => {
            conditions.push((**lhs).clone());
            walk_formula(rhs, conditions, bank, out);
            conditions.pop();
        }
        Formula::Forall(_, f) => walk_formula(f, conditions, bank, out),
        Formula::Iff(lhs, rhs) => {
            try_predicate_definition(lhs, rhs, conditions, bank, out);
            try_predicate_definition(rhs, lhs, conditions, bank, out);
        }
        Formula::Not(f) => {
            if matches!(**f, Formula::Literal(_)) {
                walk_formula(f, conditions, bank, out);
            }
        }
        Formula::Or(_) | Formula::Exists(_, _) => {}
    }
}

fn try_function_definition(
    header: TermId,
    body: TermId,
    conditions: &[Formula],
    bank: &TermBank,
    out: &mut HashMap<DefinedSymbol, InductionTemplate>,
) {
    if !is_header(header, bank) {
        return;
    }
    let functor = bank.functor(header).expect("headers are applications");
    let step_args = bank.args(header).to_vec();
    let mut recursive_calls = Vec::new();
    collect_recursive_calls(body, functor, bank, &mut recursive_calls);

    // Only orientations that decrease are definitions; a tentative
    // template with just this case must already be well-founded
    let mut tentative = InductionTemplate::new();
    tentative.rdescs.push(RDescription {
        conditions: conditions.to_vec(),
        recursive_calls: recursive_calls.clone(),
        step_args: step_args.clone(),
    });
    if !tentative.check_well_foundedness(bank) {
        return;
    }

    out.entry(DefinedSymbol::Function(functor))
        .or_insert_with(InductionTemplate::new)
        .rdescs
        .push(RDescription {
            conditions: conditions.to_vec(),
            recursive_calls,
            step_args,
        });
}

fn try_predicate_definition(
    header: &Formula,
    body: &Formula,
    conditions: &[Formula],
    bank: &TermBank,
    out: &mut HashMap<DefinedSymbol, InductionTemplate>,
) {
    let lit = match header {
        Formula::Literal(lit) if !bank.is_equality(*lit) => *lit,
        _ => return,
    };
    let args = bank.literal_args(lit).to_vec();
    // Header arguments must be constructor terms
    if !args.iter().all(|&a| is_constructor_term(a, bank)) {
        return;
    }
    let pred = bank.literal_predicate(lit);
    let mut recursive_calls = Vec::new();
    collect_predicate_calls(body, pred, bank, &mut recursive_calls);

    let mut tentative = InductionTemplate::new();
    tentative.rdescs.push(RDescription {
        conditions: conditions.to_vec(),
        recursive_calls: recursive_calls.clone(),
        step_args: args.clone(),
    });
    if !tentative.check_well_foundedness(bank) {
        return;
    }

    out.entry(DefinedSymbol::Predicate(pred))
        .or_insert_with(InductionTemplate::new)
        .rdescs
        .push(RDescription {
            conditions: conditions.to_vec(),
            recursive_calls,
            step_args: args,
        });
}
