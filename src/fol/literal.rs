//! Hash-consed literals
//!
//! Literals are interned independently from terms, in the same bank.
//! A literal is a predicate applied to shared term arguments plus a
//! polarity. Equality literals are commutatively normalized at interning
//! time: the two arguments are stored sorted by term handle, and the
//! "arguments were swapped" bit is cached on the shared literal.

use super::signature::PredicateId;
use super::term::{TermBank, TermId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Handle of a shared literal. Equality of handles is structural equality.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LiteralId(pub(crate) u32);

impl LiteralId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl Serialize for LiteralId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LiteralId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        u32::deserialize(deserializer).map(LiteralId)
    }
}

/// Structural key of a shared literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiteralData {
    pub predicate: PredicateId,
    pub polarity: bool,
    pub args: Vec<TermId>,
}

pub(super) struct LiteralInfo {
    pub(super) data: LiteralData,
    pub(super) weight: u32,
    /// True if commutative normalization swapped the equality arguments.
    pub(super) swapped: bool,
}

impl TermBank {
    /// Intern a literal (get-or-create). Equality arguments are sorted by
    /// handle; the swap is recorded in the normalization bit.
    pub fn literal(&mut self, predicate: PredicateId, polarity: bool, mut args: Vec<TermId>) -> LiteralId {
        debug_assert_eq!(
            args.len(),
            self.signature.predicate_arity(predicate) as usize,
            "arity mismatch for {}",
            self.signature.predicate_name(predicate)
        );
        let mut swapped = false;
        if self.signature.predicate_is_commutative(predicate) && args.len() == 2 && args[0] > args[1]
        {
            args.swap(0, 1);
            swapped = true;
        }
        let data = LiteralData {
            predicate,
            polarity,
            args,
        };
        if let Some(&id) = self.literal_dedup.get(&data) {
            return id;
        }
        let weight = 1 + data.args.iter().map(|&t| self.weight(t)).sum::<u32>();
        let id = LiteralId(self.literals.len() as u32);
        self.literals.push(LiteralInfo {
            data: data.clone(),
            weight,
            swapped,
        });
        self.literal_dedup.insert(data, id);
        id
    }

    /// Positive literal shorthand.
    pub fn positive(&mut self, predicate: PredicateId, args: Vec<TermId>) -> LiteralId {
        self.literal(predicate, true, args)
    }

    /// Negative literal shorthand.
    pub fn negative(&mut self, predicate: PredicateId, args: Vec<TermId>) -> LiteralId {
        self.literal(predicate, false, args)
    }

    /// Intern an equality literal `l = r` (or its negation).
    pub fn equality(&mut self, polarity: bool, l: TermId, r: TermId) -> LiteralId {
        let eq = self.signature.equality();
        self.literal(eq, polarity, vec![l, r])
    }

    /// The same atom with flipped polarity.
    pub fn complement(&mut self, lit: LiteralId) -> LiteralId {
        let data = self.literal_data(lit).clone();
        self.literal(data.predicate, !data.polarity, data.args)
    }

    pub fn literal_count(&self) -> usize {
        self.literals.len()
    }

    // === Accessors ===

    pub fn literal_data(&self, lit: LiteralId) -> &LiteralData {
        &self.literals[lit.0 as usize].data
    }

    pub fn literal_predicate(&self, lit: LiteralId) -> PredicateId {
        self.literal_data(lit).predicate
    }

    pub fn literal_polarity(&self, lit: LiteralId) -> bool {
        self.literal_data(lit).polarity
    }

    pub fn literal_args(&self, lit: LiteralId) -> &[TermId] {
        &self.literal_data(lit).args
    }

    /// O(1) cached literal weight (1 + argument term weights).
    pub fn literal_weight(&self, lit: LiteralId) -> u32 {
        self.literals[lit.0 as usize].weight
    }

    /// The cached commutative-normalization bit.
    pub fn literal_was_swapped(&self, lit: LiteralId) -> bool {
        self.literals[lit.0 as usize].swapped
    }

    pub fn is_equality(&self, lit: LiteralId) -> bool {
        self.literal_predicate(lit) == self.signature.equality()
    }

    /// Header of a literal: predicate plus polarity. Two literals can only
    /// match if their headers agree.
    pub fn literal_header(&self, lit: LiteralId) -> (PredicateId, bool) {
        let data = self.literal_data(lit);
        (data.predicate, data.polarity)
    }

    pub fn literal_is_ground(&self, lit: LiteralId) -> bool {
        self.literal_args(lit).iter().all(|&t| self.is_ground(t))
    }

    /// Largest variable index in the literal, if any.
    pub fn literal_max_var(&self, lit: LiteralId) -> Option<u32> {
        self.literal_args(lit)
            .iter()
            .filter_map(|&t| self.max_var(t))
            .max()
    }

    /// Collect distinct variable indices of the literal.
    pub fn literal_collect_vars(&self, lit: LiteralId, out: &mut Vec<u32>) {
        for &t in self.literal_args(lit) {
            self.collect_vars(t, out);
        }
    }

    /// Shift every variable of the literal by `offset`.
    pub fn literal_shift_vars(&mut self, lit: LiteralId, offset: u32) -> LiteralId {
        if offset == 0 {
            return lit;
        }
        let data = self.literal_data(lit).clone();
        let args = data
            .args
            .iter()
            .map(|&t| self.shift_vars(t, offset))
            .collect();
        self.literal(data.predicate, data.polarity, args)
    }

    /// Format a literal with symbol names resolved.
    pub fn display_literal(&self, lit: LiteralId) -> LiteralDisplay<'_> {
        LiteralDisplay { bank: self, lit }
    }
}

/// Display wrapper resolving symbol names through the bank.
pub struct LiteralDisplay<'a> {
    bank: &'a TermBank,
    lit: LiteralId,
}

impl fmt::Display for LiteralDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.bank.literal_data(self.lit);
        if !data.polarity {
            write!(f, "~")?;
        }
        if self.bank.is_equality(self.lit) && data.args.len() == 2 {
            return write!(
                f,
                "{} = {}",
                self.bank.display_term(data.args[0]),
                self.bank.display_term(data.args[1])
            );
        }
        write!(f, "{}", self.bank.signature.predicate_name(data.predicate))?;
        if !data.args.is_empty() {
            write!(f, "(")?;
            for (i, &arg) in data.args.iter().enumerate() {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_interning_idempotent() {
        let mut bank = TermBank::new();
        let p = bank.signature.add_plain_predicate("p", 1);
        let a = bank.signature.add_plain_function("a", 0);
        let ca = bank.constant(a);

        let l1 = bank.positive(p, vec![ca]);
        let count = bank.literal_count();
        let l2 = bank.positive(p, vec![ca]);
        assert_eq!(l1, l2);
        assert_eq!(bank.literal_count(), count);

        let l3 = bank.negative(p, vec![ca]);
        assert_ne!(l1, l3);
    }

    #[test]
    fn test_equality_argument_normalization() {
        let mut bank = TermBank::new();
        let a = bank.signature.add_plain_function("a", 0);
        let b = bank.signature.add_plain_function("b", 0);
        let ca = bank.constant(a);
        let cb = bank.constant(b);

        // a interned before b, so the handle order is ca < cb
        let l1 = bank.equality(true, ca, cb);
        let l2 = bank.equality(true, cb, ca);
        assert_eq!(l1, l2);
        assert_eq!(bank.literal_args(l1), &[ca, cb]);

        // Exactly one of the two spellings records a swap
        assert!(bank.literal_was_swapped(l2));
    }

    #[test]
    fn test_complement() {
        let mut bank = TermBank::new();
        let p = bank.signature.add_plain_predicate("p", 1);
        let x = bank.var(0);
        let pos = bank.positive(p, vec![x]);
        let neg = bank.complement(pos);
        assert_eq!(bank.literal_polarity(neg), false);
        assert_eq!(bank.complement(neg), pos);
    }

    #[test]
    fn test_literal_weight() {
        let mut bank = TermBank::new();
        let p = bank.signature.add_plain_predicate("p", 2);
        let f = bank.signature.add_plain_function("f", 1);
        let x = bank.var(0);
        let fx = bank.app(f, vec![x]);
        let lit = bank.positive(p, vec![fx, x]);
        // 1 (predicate) + 2 (f(x)) + 1 (x)
        assert_eq!(bank.literal_weight(lit), 4);
    }

    #[test]
    fn test_header_and_groundness() {
        let mut bank = TermBank::new();
        let p = bank.signature.add_plain_predicate("p", 1);
        let a = bank.signature.add_plain_function("a", 0);
        let ca = bank.constant(a);
        let x = bank.var(0);

        let ground = bank.positive(p, vec![ca]);
        let open = bank.negative(p, vec![x]);
        assert!(bank.literal_is_ground(ground));
        assert!(!bank.literal_is_ground(open));
        assert_eq!(bank.literal_header(ground), (p, true));
        assert_eq!(bank.literal_header(open), (p, false));
    }

    #[test]
    fn test_display() {
        let mut bank = TermBank::new();
        let p = bank.signature.add_plain_predicate("p", 1);
        let a = bank.signature.add_plain_function("a", 0);
        let ca = bank.constant(a);
        let lit = bank.negative(p, vec![ca]);
        assert_eq!(format!("{}", bank.display_literal(lit)), "~p(a)");

        let b = bank.signature.add_plain_function("b", 0);
        let cb = bank.constant(b);
        let eq = bank.equality(true, ca, cb);
        assert_eq!(format!("{}", bank.display_literal(eq)), "a = b");
    }
}
