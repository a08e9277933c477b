//! First-order logic data structures
//!
//! Hash-consed terms and literals, clauses, substitutions, the term
//! ordering, formulas, and the clausifier.

pub mod clausify;
pub mod clause;
pub mod formula;
pub mod literal;
pub mod matching;
pub mod ordering;
pub mod signature;
pub mod substitution;
pub mod term;

// Re-export commonly used types
pub use clause::{clause_weight, AuxToken, AuxWorkspace, Clause, ClauseRole, StoreState};
pub use clausify::Clausifier;
pub use formula::Formula;
pub use literal::{LiteralData, LiteralId};
pub use matching::{
    are_variant_terms, match_literal, match_literal_reversed, match_term, try_match, unify,
    unify_args,
};
pub use ordering::{KBOConfig, TermOrdering, KBO};
pub use signature::{
    ArithFunction, ArithPredicate, ArithSymbols, BuiltinSort, FunctionId, PredicateId, Signature,
    SortId,
};
pub use substitution::{Binder, Substitution};
pub use term::{TermBank, TermData, TermId};
