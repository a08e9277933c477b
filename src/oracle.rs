//! External arithmetic oracle contract
//!
//! The saturation loop may hand a set of ground arithmetic literals to an
//! external decision procedure. `Unsat` is surfaced as a refutation
//! premise; `Unknown` is a local failure of the consulting inference and
//! never propagates.

use crate::fol::{LiteralId, TermBank};

/// Verdict of the oracle on a literal conjunction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleVerdict {
    Sat,
    Unsat {
        /// Indices into the queried literal slice, if the oracle can name
        /// an unsatisfiable core
        core: Option<Vec<usize>>,
    },
    Unknown,
}

/// A pluggable linear-arithmetic decision procedure.
pub trait ArithOracle {
    fn decide(
        &mut self,
        literals: &[LiteralId],
        only_equalities: bool,
        bank: &TermBank,
    ) -> OracleVerdict;
}
