//! Run statistics and termination bookkeeping
//!
//! Counters are incremented at the exact call sites of the saturation loop
//! and the engines; the whole struct serializes to JSON for run reports.

use serde::{Deserialize, Serialize};

/// Why the saturation loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Still running / not terminated yet
    #[default]
    Unknown,
    /// Empty clause derived
    Refutation,
    /// Clause set saturated under the active rules
    Saturated,
    TimeLimit,
    MemoryLimit,
    IterationLimit,
}

/// Counters for one prover run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub iterations: usize,
    /// Clauses produced by generating inferences
    pub generated: usize,
    /// Clauses moved to the active set
    pub activations: usize,
    /// Clauses admitted to passive
    pub passive_added: usize,
    /// Clauses deleted by forward subsumption
    pub forward_subsumed: usize,
    /// Clauses deleted by backward subsumption
    pub backward_subsumed: usize,
    /// Conclusions produced by subsumption resolution
    pub subsumption_resolutions: usize,
    /// Forward demodulation rewrites
    pub forward_demodulations: usize,
    /// Backward demodulation rewrites
    pub backward_demodulations: usize,
    /// Tautologies deleted
    pub tautologies_deleted: usize,
    /// Clauses with duplicate literals compacted
    pub duplicate_literals_removed: usize,
    /// Clauses discarded for exceeding the weight limit (not redundant)
    pub discarded_nonredundant: usize,
    /// Arithmetic inferences skipped because a coefficient overflowed
    pub arith_overflow_skips: usize,
    /// Components produced by splitting
    pub split_components: usize,
    /// Active clauses sent back to passive by splitting
    pub reactivations: usize,
    /// Induction schemes instantiated
    pub induction_schemes: usize,
    /// Induction hypotheses resolved into the search space
    pub induction_applications: usize,
    /// Schemes skipped by the formula index
    pub induction_duplicates: usize,
    pub termination: TerminationReason,
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    /// JSON report of the run.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("statistics serialize")
    }
}
