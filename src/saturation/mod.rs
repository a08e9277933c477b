//! Saturation-based theorem proving with the given-clause algorithm

pub mod passive;
pub mod prover;
pub mod rule;
pub mod splitting;
pub mod state;

pub use passive::PassiveQueue;
pub use prover::{Prover, SaturationOutcome};
pub use rule::{Generated, GeneratingRule, RuleContext, Simplification, SimplifyingRule};
pub use splitting::components;
pub use state::SaturationState;
