//! Problem input
//!
//! A problem is a list of named, role-tagged units: either clauses (ready
//! for the loop) or formulas (clausified at intake). The input contract
//! requires well-sorted content over declared symbols; the arity check at
//! the term bank boundary enforces the declared-symbol part.

use crate::fol::{ClauseRole, Formula, LiteralId};

/// One input unit.
#[derive(Debug, Clone)]
pub struct InputUnit {
    pub name: String,
    pub role: ClauseRole,
    pub content: UnitContent,
}

#[derive(Debug, Clone)]
pub enum UnitContent {
    Clause(Vec<LiteralId>),
    Formula(Formula),
}

/// A set of typed first-order formulas/clauses with equality.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    pub units: Vec<InputUnit>,
}

impl Problem {
    pub fn new() -> Self {
        Problem { units: Vec::new() }
    }

    pub fn add_clause(&mut self, name: impl Into<String>, role: ClauseRole, literals: Vec<LiteralId>) {
        self.units.push(InputUnit {
            name: name.into(),
            role,
            content: UnitContent::Clause(literals),
        });
    }

    pub fn add_formula(&mut self, name: impl Into<String>, role: ClauseRole, formula: Formula) {
        self.units.push(InputUnit {
            name: name.into(),
            role,
            content: UnitContent::Formula(formula),
        });
    }
}
