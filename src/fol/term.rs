//! Hash-consed terms
//!
//! Every term lives in the arena owned by `TermBank`; a `TermId` is an
//! opaque index into it. Interning guarantees perfect sharing: two terms are
//! structurally equal iff their handles are equal, so all downstream
//! comparisons are id comparisons.
//!
//! The bank caches `weight` (sum of functor weights plus variable count) and
//! `vars` (number of variable occurrences) at interning time, making both
//! O(1) reads — the clause-weight heuristic never recurses into terms.

use super::signature::{FunctionId, Signature};
use crate::error::{Result, VulcanError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Handle of a shared term. Equality of handles is structural equality.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(pub(crate) u32);

impl TermId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl Serialize for TermId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TermId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        u32::deserialize(deserializer).map(TermId)
    }
}

/// Shape of a shared term: a variable index or a functor application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermData {
    Var(u32),
    App { functor: FunctionId, args: Vec<TermId> },
}

struct TermInfo {
    data: TermData,
    weight: u32,
    vars: u32,
}

/// Arena of shared terms (and literals, see `fol::literal`).
///
/// The bank owns the signature so that interning can consult arities,
/// commutativity and symbol weights in one place.
pub struct TermBank {
    pub signature: Signature,
    terms: Vec<TermInfo>,
    dedup: HashMap<TermData, TermId>,
    pub(super) literals: Vec<super::literal::LiteralInfo>,
    pub(super) literal_dedup: HashMap<super::literal::LiteralData, super::literal::LiteralId>,
}

impl TermBank {
    pub fn new() -> Self {
        TermBank {
            signature: Signature::new(),
            terms: Vec::new(),
            dedup: HashMap::new(),
            literals: Vec::new(),
            literal_dedup: HashMap::new(),
        }
    }

    pub fn with_signature(signature: Signature) -> Self {
        TermBank {
            signature,
            terms: Vec::new(),
            dedup: HashMap::new(),
            literals: Vec::new(),
            literal_dedup: HashMap::new(),
        }
    }

    /// Number of shared terms. Duplicate interning leaves this unchanged.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Intern a variable with the given index.
    pub fn var(&mut self, index: u32) -> TermId {
        self.share(TermData::Var(index))
    }

    /// Intern a functional term. Commutative functors get their argument
    /// pair pre-sorted by handle so that shared terms are commutatively
    /// normal. Arity agreement is the caller's obligation; the fallible
    /// boundary entry is `try_app`.
    pub fn app(&mut self, functor: FunctionId, mut args: Vec<TermId>) -> TermId {
        debug_assert_eq!(
            args.len(),
            self.signature.function_arity(functor) as usize,
            "arity mismatch for {}",
            self.signature.function_name(functor)
        );
        if self.signature.function_is_commutative(functor) && args.len() == 2 && args[0] > args[1] {
            args.swap(0, 1);
        }
        self.share(TermData::App { functor, args })
    }

    /// Arity-checked interning for terms arriving from outside the prover.
    pub fn try_app(&mut self, functor: FunctionId, args: Vec<TermId>) -> Result<TermId> {
        let expected = self.signature.function_arity(functor) as usize;
        if args.len() != expected {
            return Err(VulcanError::ArityMismatch {
                symbol: self.signature.function_name(functor).to_string(),
                expected,
                found: args.len(),
            });
        }
        Ok(self.app(functor, args))
    }

    /// Intern a constant (0-ary function).
    pub fn constant(&mut self, functor: FunctionId) -> TermId {
        self.app(functor, Vec::new())
    }

    fn share(&mut self, data: TermData) -> TermId {
        if let Some(&id) = self.dedup.get(&data) {
            return id;
        }
        let (weight, vars) = match &data {
            TermData::Var(_) => (1, 1),
            TermData::App { functor, args } => {
                let mut weight = self.signature.function_weight(*functor);
                let mut vars = 0;
                for &arg in args {
                    let info = &self.terms[arg.0 as usize];
                    weight += info.weight;
                    vars += info.vars;
                }
                (weight, vars)
            }
        };
        debug_assert!(weight >= 1);
        let id = TermId(self.terms.len() as u32);
        self.terms.push(TermInfo {
            data: data.clone(),
            weight,
            vars,
        });
        self.dedup.insert(data, id);
        id
    }

    // === O(1) cached attributes ===

    pub fn weight(&self, t: TermId) -> u32 {
        self.terms[t.0 as usize].weight
    }

    pub fn vars(&self, t: TermId) -> u32 {
        self.terms[t.0 as usize].vars
    }

    pub fn is_ground(&self, t: TermId) -> bool {
        self.vars(t) == 0
    }

    // === Structure access ===

    pub fn term_data(&self, t: TermId) -> &TermData {
        &self.terms[t.0 as usize].data
    }

    pub fn as_var(&self, t: TermId) -> Option<u32> {
        match self.term_data(t) {
            TermData::Var(v) => Some(*v),
            TermData::App { .. } => None,
        }
    }

    pub fn is_var(&self, t: TermId) -> bool {
        matches!(self.term_data(t), TermData::Var(_))
    }

    pub fn functor(&self, t: TermId) -> Option<FunctionId> {
        match self.term_data(t) {
            TermData::Var(_) => None,
            TermData::App { functor, .. } => Some(*functor),
        }
    }

    pub fn args(&self, t: TermId) -> &[TermId] {
        match self.term_data(t) {
            TermData::Var(_) => &[],
            TermData::App { args, .. } => args,
        }
    }

    /// Collect the distinct variable indices of a term.
    pub fn collect_vars(&self, t: TermId, out: &mut Vec<u32>) {
        match self.term_data(t) {
            TermData::Var(v) => {
                if !out.contains(v) {
                    out.push(*v);
                }
            }
            TermData::App { args, .. } => {
                for &arg in args {
                    self.collect_vars(arg, out);
                }
            }
        }
    }

    /// Largest variable index occurring in the term, if any.
    pub fn max_var(&self, t: TermId) -> Option<u32> {
        match self.term_data(t) {
            TermData::Var(v) => Some(*v),
            TermData::App { args, .. } => args.iter().filter_map(|&arg| self.max_var(arg)).max(),
        }
    }

    /// Does variable `v` occur in `t`?
    pub fn occurs(&self, v: u32, t: TermId) -> bool {
        match self.term_data(t) {
            TermData::Var(w) => *w == v,
            TermData::App { args, .. } => args.iter().any(|&arg| self.occurs(v, arg)),
        }
    }

    /// Is `sub` a subterm of `t` (reflexive)?
    pub fn is_subterm(&self, sub: TermId, t: TermId) -> bool {
        if sub == t {
            return true;
        }
        match self.term_data(t) {
            TermData::Var(_) => false,
            TermData::App { args, .. } => args.iter().any(|&arg| self.is_subterm(sub, arg)),
        }
    }

    /// Is `sub` a strict subterm of `t`?
    pub fn is_strict_subterm(&self, sub: TermId, t: TermId) -> bool {
        sub != t && self.is_subterm(sub, t)
    }

    /// All subterm handles of `t` in preorder, including `t` itself.
    pub fn subterms(&self, t: TermId) -> Vec<TermId> {
        let mut out = Vec::new();
        let mut stack = vec![t];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            if let TermData::App { args, .. } = self.term_data(cur) {
                for &arg in args.iter().rev() {
                    stack.push(arg);
                }
            }
        }
        out
    }

    /// Rewrite every occurrence of `from` inside `t` to `to`, re-interning
    /// along the way.
    pub fn replace(&mut self, t: TermId, from: TermId, to: TermId) -> TermId {
        if t == from {
            return to;
        }
        match self.term_data(t).clone() {
            TermData::Var(_) => t,
            TermData::App { functor, args } => {
                let new_args: Vec<TermId> =
                    args.iter().map(|&arg| self.replace(arg, from, to)).collect();
                if new_args == args {
                    t
                } else {
                    self.app(functor, new_args)
                }
            }
        }
    }

    /// Shift every variable of `t` by `offset` (disjointness renaming).
    pub fn shift_vars(&mut self, t: TermId, offset: u32) -> TermId {
        if offset == 0 || self.vars(t) == 0 {
            return t;
        }
        match self.term_data(t).clone() {
            TermData::Var(v) => self.var(v + offset),
            TermData::App { functor, args } => {
                let new_args = args.iter().map(|&arg| self.shift_vars(arg, offset)).collect();
                self.app(functor, new_args)
            }
        }
    }

    /// Format a term with symbol names resolved.
    pub fn display_term(&self, t: TermId) -> TermDisplay<'_> {
        TermDisplay { bank: self, term: t }
    }
}

impl Default for TermBank {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TermBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermBank")
            .field("terms", &self.terms.len())
            .field("literals", &self.literals.len())
            .finish()
    }
}

/// Display wrapper resolving symbol names through the bank.
pub struct TermDisplay<'a> {
    bank: &'a TermBank,
    term: TermId,
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bank.term_data(self.term) {
            TermData::Var(v) => write!(f, "X{}", v),
            TermData::App { functor, args } => {
                write!(f, "{}", self.bank.signature.function_name(*functor))?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    for (i, &arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{}", self.bank.display_term(arg))?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}
