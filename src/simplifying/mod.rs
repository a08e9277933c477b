//! Simplifying inference rule implementations

pub mod demodulation;
pub mod subsumption;
pub mod tautology;

pub use demodulation::DemodulationRule;
pub use subsumption::SubsumptionRule;
pub use tautology::TautologyRule;
