//! Induction scheme instantiation
//!
//! A scheme is a ground instance of a template against a concrete
//! occurrence of the defined symbol: a substitution for each induction
//! term per case (step and recursive hypotheses), the set of induction
//! terms, and the highest variable used, so fresh instances can be
//! produced.

use super::templates::{InductionTemplate, RDescription};
use crate::fol::{Formula, Substitution, TermBank, TermData, TermId};
use std::collections::HashMap;

/// Can the term trigger induction: a ground non-variable term headed by a
/// Skolem symbol (or any non-constructor symbol when complex terms are
/// permitted)?
pub fn can_induct_on(t: TermId, bank: &TermBank, on_complex_terms: bool) -> bool {
    if !bank.is_ground(t) {
        return false;
    }
    match bank.term_data(t) {
        TermData::Var(_) => false,
        TermData::App { functor, .. } => {
            if bank.signature.is_skolem(*functor) {
                return true;
            }
            on_complex_terms && !bank.signature.is_constructor(*functor)
        }
    }
}

/// One case of a scheme: guard conditions plus the substitutions mapping
/// each induction term to its recursive-hypothesis and step instances.
#[derive(Debug, Clone)]
pub struct SchemeCase {
    pub conditions: Vec<Formula>,
    /// One map per recursive call
    pub recursive: Vec<HashMap<TermId, TermId>>,
    /// The step conclusion map
    pub step: HashMap<TermId, TermId>,
}

/// A template instantiated against concrete induction terms.
#[derive(Debug, Clone)]
pub struct InductionScheme {
    pub cases: Vec<SchemeCase>,
    /// Induction terms in order of first occurrence
    pub terms: Vec<TermId>,
    /// Strict upper bound on variables used by the instantiated cases
    pub max_var: u32,
}

impl InductionScheme {
    /// Instantiate a template against the arguments of one occurrence.
    /// `next_var` supplies fresh variables for the renamed case patterns.
    /// Returns None when an inducted argument is not an induction term or
    /// the same term would receive conflicting patterns.
    pub fn instantiate(
        template: &InductionTemplate,
        args: &[TermId],
        on_complex_terms: bool,
        mut next_var: u32,
        bank: &mut TermBank,
    ) -> Option<InductionScheme> {
        let mut terms = Vec::new();
        for (i, inducted) in template.induction_positions.iter().enumerate() {
            if !inducted {
                continue;
            }
            let arg = args[i];
            if !can_induct_on(arg, bank, on_complex_terms) {
                return None;
            }
            if !terms.contains(&arg) {
                terms.push(arg);
            }
        }
        if terms.is_empty() {
            return None;
        }

        let mut cases = Vec::new();
        for rdesc in &template.rdescs {
            let case = instantiate_case(rdesc, template, args, &mut next_var, bank)?;
            cases.push(case);
        }

        let scheme = InductionScheme {
            cases,
            terms,
            max_var: next_var,
        };
        if !scheme.check_well_foundedness(bank) {
            return None;
        }
        Some(scheme)
    }

    /// The designated induction positions must admit a strict subterm
    /// order across all recursive calls of the instantiated cases.
    pub fn check_well_foundedness(&self, bank: &TermBank) -> bool {
        for case in &self.cases {
            for rec in &case.recursive {
                let mut strict = false;
                for &term in &self.terms {
                    let step_val = match case.step.get(&term) {
                        Some(&v) => v,
                        None => continue,
                    };
                    let rec_val = match rec.get(&term) {
                        Some(&v) => v,
                        None => continue,
                    };
                    if rec_val == step_val {
                        continue;
                    }
                    if bank.is_strict_subterm(rec_val, step_val) {
                        strict = true;
                    } else {
                        return false;
                    }
                }
                if !strict {
                    return false;
                }
            }
        }
        true
    }
}

/// Rename a case's variables fresh and build the per-induction-term maps.
fn instantiate_case(
    rdesc: &RDescription,
    template: &InductionTemplate,
    args: &[TermId],
    next_var: &mut u32,
    bank: &mut TermBank,
) -> Option<SchemeCase> {
    // Fresh renaming of every template variable in this case
    let mut case_vars = Vec::new();
    for &arg in &rdesc.step_args {
        bank.collect_vars(arg, &mut case_vars);
    }
    for call in &rdesc.recursive_calls {
        for &arg in call {
            bank.collect_vars(arg, &mut case_vars);
        }
    }
    let mut renaming = Substitution::new();
    for v in case_vars {
        let fresh = bank.var(*next_var);
        *next_var += 1;
        renaming.bind(v, fresh);
    }

    let mut step = HashMap::new();
    for (i, inducted) in template.induction_positions.iter().enumerate() {
        if !inducted {
            continue;
        }
        let pattern = renaming.apply(rdesc.step_args[i], bank);
        match step.get(&args[i]) {
            Some(&existing) if existing != pattern => return None,
            _ => {
                step.insert(args[i], pattern);
            }
        }
    }

    let mut recursive = Vec::new();
    for call in &rdesc.recursive_calls {
        let mut map = HashMap::new();
        for (i, inducted) in template.induction_positions.iter().enumerate() {
            if !inducted {
                continue;
            }
            let pattern = renaming.apply(call[i], bank);
            match map.get(&args[i]) {
                Some(&existing) if existing != pattern => return None,
                _ => {
                    map.insert(args[i], pattern);
                }
            }
        }
        recursive.push(map);
    }

    let conditions = rdesc
        .conditions
        .iter()
        .map(|c| c.apply_substitution(&renaming, bank))
        .collect();

    Some(SchemeCase {
        conditions,
        recursive,
        step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::{ClauseRole, FunctionId};
    use crate::induction::templates::{discover_templates, DefinedSymbol};

    struct NatCtx {
        bank: TermBank,
        zero: FunctionId,
        succ: FunctionId,
        add: FunctionId,
    }

    impl NatCtx {
        fn new() -> Self {
            let mut bank = TermBank::new();
            let nat = bank
                .signature
                .add_sort("nat", crate::fol::BuiltinSort::Individual);
            let zero = bank.signature.add_function("zero", &[], nat);
            let succ = bank.signature.add_function("succ", &[nat], nat);
            bank.signature.mark_constructor(zero);
            bank.signature.mark_constructor(succ);
            let add = bank.signature.add_function("add", &[nat, nat], nat);
            NatCtx {
                bank,
                zero,
                succ,
                add,
            }
        }

        fn add_template(&mut self) -> crate::induction::templates::InductionTemplates {
            let bank = &mut self.bank;
            let x = bank.var(0);
            let y = bank.var(1);
            let z = bank.constant(self.zero);
            let sx = bank.app(self.succ, vec![x]);
            let add_zy = bank.app(self.add, vec![z, y]);
            let base = bank.equality(true, add_zy, y);
            let add_sxy = bank.app(self.add, vec![sx, y]);
            let add_xy = bank.app(self.add, vec![x, y]);
            let s_add = bank.app(self.succ, vec![add_xy]);
            let step = bank.equality(true, add_sxy, s_add);
            let formulas = vec![
                (Formula::lit(base), ClauseRole::Axiom),
                (Formula::lit(step), ClauseRole::Axiom),
            ];
            discover_templates(&formulas, &mut self.bank, false)
        }
    }

    #[test]
    fn test_can_induct_on_skolem() {
        let mut ctx = NatCtx::new();
        let nat = ctx.bank.signature.add_sort("nat", crate::fol::BuiltinSort::Individual);
        let sk = ctx.bank.signature.add_skolem(&[], nat);
        let sk_term = ctx.bank.constant(sk);
        let x = ctx.bank.var(0);
        let z = ctx.bank.constant(ctx.zero);

        assert!(can_induct_on(sk_term, &ctx.bank, false));
        assert!(!can_induct_on(x, &ctx.bank, false));
        // Constructor terms are never inducted on
        assert!(!can_induct_on(z, &ctx.bank, false));

        // Complex terms only with the configuration flag
        let add_sk = ctx.bank.app(ctx.add, vec![sk_term, z]);
        assert!(!can_induct_on(add_sk, &ctx.bank, false));
        assert!(can_induct_on(add_sk, &ctx.bank, true));
    }

    #[test]
    fn test_instantiate_add_scheme() {
        let mut ctx = NatCtx::new();
        let templates = ctx.add_template();
        let template = templates
            .get(DefinedSymbol::Function(ctx.add))
            .unwrap()
            .clone();

        let nat = ctx.bank.signature.add_sort("nat", crate::fol::BuiltinSort::Individual);
        let sk = ctx.bank.signature.add_skolem(&[], nat);
        let sk_term = ctx.bank.constant(sk);
        let z = ctx.bank.constant(ctx.zero);

        // Occurrence add(sk, zero): induct on the first argument
        let scheme =
            InductionScheme::instantiate(&template, &[sk_term, z], false, 100, &mut ctx.bank)
                .expect("scheme instantiates");

        assert_eq!(scheme.terms, vec![sk_term]);
        assert_eq!(scheme.cases.len(), 2);

        // The base case maps sk to zero, the step case to succ(fresh)
        let base = scheme
            .cases
            .iter()
            .find(|c| c.recursive.is_empty())
            .unwrap();
        assert_eq!(base.step.get(&sk_term), Some(&z));

        let step = scheme
            .cases
            .iter()
            .find(|c| !c.recursive.is_empty())
            .unwrap();
        let step_val = *step.step.get(&sk_term).unwrap();
        assert_eq!(ctx.bank.functor(step_val), Some(ctx.succ));
        // The recursive hypothesis strictly decreases
        let rec_val = *step.recursive[0].get(&sk_term).unwrap();
        assert!(ctx.bank.is_strict_subterm(rec_val, step_val));
    }

    #[test]
    fn test_instantiate_requires_inducible_argument() {
        let mut ctx = NatCtx::new();
        let templates = ctx.add_template();
        let template = templates
            .get(DefinedSymbol::Function(ctx.add))
            .unwrap()
            .clone();

        // add(zero, zero): the inducted position holds a constructor term
        let z = ctx.bank.constant(ctx.zero);
        assert!(
            InductionScheme::instantiate(&template, &[z, z], false, 100, &mut ctx.bank).is_none()
        );
    }
}
