//! Generating inference rule implementations

pub mod arith_factoring;
pub mod common;
pub mod equality_factoring;
pub mod equality_resolution;
pub mod factoring;
pub mod inequality_resolution;
pub mod resolution;
pub mod superposition;

pub use arith_factoring::ArithFactoringRule;
pub use common::{
    collect_literals_except, normalize_clause_vars, remove_duplicate_literals,
};
pub use equality_factoring::EqualityFactoringRule;
pub use equality_resolution::EqualityResolutionRule;
pub use factoring::FactoringRule;
pub use inequality_resolution::InequalityResolutionRule;
pub use resolution::ResolutionRule;
pub use superposition::SuperpositionRule;
