//! Prover configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Propositional splitting of clauses into variable-disjoint components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplittingMode {
    Off,
    /// Split input clauses only
    InputOnly,
    On,
}

/// Which induction schemes the induction engine may generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InductionMode {
    Off,
    /// Structural induction over term-algebra sorts
    Structural,
    /// Induction restricted to integer-sorted terms
    Integer,
    Both,
}

impl InductionMode {
    pub fn enabled(self) -> bool {
        self != InductionMode::Off
    }

    pub fn allows_structural(self) -> bool {
        matches!(self, InductionMode::Structural | InductionMode::Both)
    }

    pub fn allows_integer(self) -> bool {
        matches!(self, InductionMode::Integer | InductionMode::Both)
    }
}

/// Literal selection strategy choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralSelectionStrategy {
    /// Select all literals
    All,
    /// Select all maximal literals
    Maximal,
    /// Unique maximal, else max-weight negative, else all maximal
    UniqueMaximalOrNegOrMaximal,
}

/// Configuration of the saturation core. All options recognized by the
/// loop, the engines, and the induction generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProverConfig {
    /// Discard clauses heavier than this
    pub weight_limit: Option<u32>,
    /// Passive-queue interleaving: (picks by age, picks by weight)
    pub age_weight_ratio: (u32, u32),
    pub splitting: SplittingMode,
    pub induction: InductionMode,
    /// Allow induction on complex ground terms, not only Skolem constants
    pub induction_on_complex_terms: bool,
    /// Introduce fresh variables for non-recursive argument positions
    pub induction_strengthen: bool,
    /// Allow side literals of the trigger clause in the induction step
    pub induction_multiclause: bool,
    /// Bound on nested induction applications
    pub max_induction_depth: u32,
    pub subsumption_resolution: bool,
    pub literal_selection: LiteralSelectionStrategy,
    /// 0 means no limit
    pub max_iterations: usize,
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    pub show_induction: bool,
    pub show_new: bool,
    pub show_passive: bool,
    pub show_active: bool,
}

impl Default for ProverConfig {
    fn default() -> Self {
        ProverConfig {
            weight_limit: None,
            age_weight_ratio: (1, 4),
            splitting: SplittingMode::Off,
            induction: InductionMode::Off,
            induction_on_complex_terms: false,
            induction_strengthen: false,
            induction_multiclause: false,
            max_induction_depth: 2,
            subsumption_resolution: true,
            literal_selection: LiteralSelectionStrategy::UniqueMaximalOrNegOrMaximal,
            max_iterations: 0,
            timeout: Duration::from_secs(60),
            show_induction: false,
            show_new: false,
            show_passive: false,
            show_active: false,
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        d.as_secs_f64().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Ok(Duration::from_secs_f64(secs))
    }
}
