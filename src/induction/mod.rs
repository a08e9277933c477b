//! Induction engine
//!
//! Turns recursive definitions into induction hypotheses the saturation
//! loop can consume. Templates are discovered from the input formulas at
//! preprocessing time; during saturation the engine watches given clauses
//! for inducible terms (Skolem constants, optionally complex ground
//! terms), instantiates matching templates into schemes, assembles the
//! hypothesis formula, clausifies it, and resolves the results against the
//! triggering literal. A formula index keyed on blank-normalized triggers
//! prevents applying the same scheme twice.

pub mod hypothesis;
pub mod scheme;
pub mod templates;

pub use hypothesis::{clausify_and_resolve, hypothesis_formula, scheme_key};
pub use scheme::{can_induct_on, InductionScheme, SchemeCase};
pub use templates::{
    discover_templates, is_constructor_term, is_header, DefinedSymbol, InductionTemplate,
    InductionTemplates, RDescription,
};

use crate::config::InductionMode;
use crate::fol::{Clausifier, LiteralId, TermBank, TermData, TermId};
use crate::generating::normalize_clause_vars;
use crate::proof::InferenceRule;
use crate::saturation::rule::{Generated, GeneratingRule, RuleContext};
use std::collections::HashSet;
use tracing::debug;

/// Configuration slice of the induction engine.
#[derive(Debug, Clone, Copy)]
pub struct InductionSettings {
    pub mode: InductionMode,
    pub on_complex_terms: bool,
    pub strengthen: bool,
    pub multiclause: bool,
    pub show: bool,
}

/// The induction engine as a generating rule over given clauses.
pub struct InductionRule {
    templates: InductionTemplates,
    settings: InductionSettings,
    clausifier: Clausifier,
    /// Blank-normalized (trigger, case-count) pairs already applied
    applied: HashSet<(LiteralId, usize)>,
    schemes_generated: usize,
    duplicates_skipped: usize,
}

impl InductionRule {
    pub fn new(templates: InductionTemplates, settings: InductionSettings) -> Self {
        InductionRule {
            templates,
            settings,
            clausifier: Clausifier::new(),
            applied: HashSet::new(),
            schemes_generated: 0,
            duplicates_skipped: 0,
        }
    }

    /// The sort gate of the configuration: structural induction for
    /// uninterpreted sorts, integer induction for arithmetic ones.
    fn sort_allowed(&self, term: TermId, bank: &TermBank) -> bool {
        let sort = match bank.functor(term) {
            Some(f) => bank.signature.function_result_sort(f),
            None => return false,
        };
        if bank.signature.sort_is_arithmetic(sort) {
            self.settings.mode.allows_integer()
        } else {
            self.settings.mode.allows_structural()
        }
    }

    /// Template-headed occurrences inside a literal:
    /// (defined symbol, argument tuple).
    fn template_occurrences(
        &self,
        lit: LiteralId,
        bank: &TermBank,
    ) -> Vec<(DefinedSymbol, Vec<TermId>)> {
        let mut out = Vec::new();
        let pred = bank.literal_predicate(lit);
        if self
            .templates
            .get(DefinedSymbol::Predicate(pred))
            .is_some()
        {
            out.push((
                DefinedSymbol::Predicate(pred),
                bank.literal_args(lit).to_vec(),
            ));
        }
        for &arg in bank.literal_args(lit) {
            for sub in bank.subterms(arg) {
                if let TermData::App { functor, args } = bank.term_data(sub) {
                    let symbol = DefinedSymbol::Function(*functor);
                    if self.templates.get(symbol).is_some() {
                        out.push((symbol, args.clone()));
                    }
                }
            }
        }
        out
    }

    /// Side literals of the trigger clause that mention an induction term
    /// (multiclause induction carries them into the step).
    fn side_triggers(
        &self,
        literals: &[LiteralId],
        trigger: LiteralId,
        scheme: &InductionScheme,
        bank: &TermBank,
    ) -> Vec<LiteralId> {
        let mut triggers = vec![trigger];
        if !self.settings.multiclause {
            return triggers;
        }
        for &lit in literals {
            if lit == trigger || !bank.literal_is_ground(lit) {
                continue;
            }
            let mentions = bank.literal_args(lit).iter().any(|&arg| {
                scheme
                    .terms
                    .iter()
                    .any(|&term| bank.is_subterm(term, arg))
            });
            if mentions {
                triggers.push(lit);
            }
        }
        triggers
    }
}

impl GeneratingRule for InductionRule {
    fn name(&self) -> &'static str {
        "induction"
    }

    fn record_statistics(&mut self, stats: &mut crate::statistics::Statistics) {
        stats.induction_schemes += std::mem::take(&mut self.schemes_generated);
        stats.induction_duplicates += std::mem::take(&mut self.duplicates_skipped);
    }

    fn generate(&mut self, given: usize, ctx: &mut RuleContext<'_>) -> Vec<Generated> {
        if self.templates.is_empty() {
            return Vec::new();
        }
        let clauses = ctx.clauses;
        let offset = ctx.rename_offset;
        let bank = &mut *ctx.bank;

        let clause_literals = clauses[given].literals.clone();
        let mut out = Vec::new();

        for &trigger in &clause_literals {
            if !bank.literal_is_ground(trigger) {
                continue;
            }
            for (symbol, args) in self.template_occurrences(trigger, bank) {
                let template = match self.templates.get(symbol) {
                    Some(t) => t.clone(),
                    None => continue,
                };
                let mut scheme = match InductionScheme::instantiate(
                    &template,
                    &args,
                    self.settings.on_complex_terms,
                    offset,
                    bank,
                ) {
                    Some(s) => s,
                    None => continue,
                };
                if !scheme
                    .terms
                    .iter()
                    .all(|&t| self.sort_allowed(t, bank))
                {
                    continue;
                }

                let key = scheme_key(&scheme, trigger, bank);
                if self.applied.contains(&key) {
                    self.duplicates_skipped += 1;
                    continue;
                }

                if self.settings.strengthen {
                    hypothesis::strengthen_case_maps(
                        &mut scheme,
                        trigger,
                        self.settings.on_complex_terms,
                        bank,
                    );
                }

                let triggers = self.side_triggers(&clause_literals, trigger, &scheme, bank);
                let formula = hypothesis_formula(&scheme, &triggers, bank);
                if self.settings.show {
                    debug!(
                        clause = given,
                        terms = scheme.terms.len(),
                        cases = scheme.cases.len(),
                        "applying induction scheme to {}",
                        bank.display_literal(trigger)
                    );
                }
                let conclusions = clausify_and_resolve(
                    formula,
                    trigger,
                    &clause_literals,
                    &mut self.clausifier,
                    bank,
                );
                if conclusions.is_empty() {
                    continue;
                }

                self.applied.insert(key);
                self.schemes_generated += 1;
                for literals in conclusions {
                    let literals = normalize_clause_vars(&literals, bank);
                    out.push(Generated::new(
                        literals,
                        InferenceRule::Induction,
                        vec![given],
                    ));
                }
            }
        }

        out
    }
}
