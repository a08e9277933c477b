//! Term ordering (Knuth-Bendix Ordering)
//!
//! The simplification ordering used by superposition and demodulation.
//! Weights come from the bank's O(1) cache; the variable condition is
//! checked by occurrence counting. The ordering is well-founded, monotonic
//! under substitution, and stable under interning (it only consults shared
//! handles and symbol ids).

use super::signature::FunctionId;
use super::term::{TermBank, TermData, TermId};
use super::literal::LiteralId;
use std::collections::HashMap;

/// Configuration for the Knuth-Bendix ordering.
///
/// Symbol weights live in the signature (they also feed the cached term
/// weights); precedence defaults to symbol id order and can be overridden
/// per symbol.
#[derive(Debug, Clone, Default)]
pub struct KBOConfig {
    /// Precedence overrides (higher value = higher precedence)
    pub precedence: HashMap<FunctionId, usize>,
}

/// Result of comparing two terms or literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermOrdering {
    Greater,
    Less,
    Equal,
    Incomparable,
}

impl TermOrdering {
    pub fn flip(self) -> TermOrdering {
        match self {
            TermOrdering::Greater => TermOrdering::Less,
            TermOrdering::Less => TermOrdering::Greater,
            other => other,
        }
    }
}

/// Knuth-Bendix ordering over shared terms.
pub struct KBO {
    config: KBOConfig,
}

impl KBO {
    pub fn new(config: KBOConfig) -> Self {
        KBO { config }
    }

    /// Precedence of a function symbol; defaults to its interning order.
    fn precedence(&self, id: FunctionId) -> (usize, u32) {
        (
            self.config.precedence.get(&id).copied().unwrap_or(0),
            id.as_u32(),
        )
    }

    /// Count occurrences of each variable.
    fn count_variables(&self, term: TermId, bank: &TermBank, counts: &mut HashMap<u32, usize>) {
        match bank.term_data(term) {
            TermData::Var(v) => {
                *counts.entry(*v).or_insert(0) += 1;
            }
            TermData::App { args, .. } => {
                for &arg in args {
                    self.count_variables(arg, bank, counts);
                }
            }
        }
    }

    /// Compare two shared terms.
    pub fn compare(&self, s: TermId, t: TermId, bank: &TermBank) -> TermOrdering {
        // Shared handles: syntactic equality is handle equality
        if s == t {
            return TermOrdering::Equal;
        }

        let mut vars_s = HashMap::new();
        let mut vars_t = HashMap::new();
        self.count_variables(s, bank, &mut vars_s);
        self.count_variables(t, bank, &mut vars_t);

        // s > t needs #(x, s) >= #(x, t) for every variable x
        let s_covers_t = vars_t
            .iter()
            .all(|(v, ct)| vars_s.get(v).copied().unwrap_or(0) >= *ct);
        let t_covers_s = vars_s
            .iter()
            .all(|(v, cs)| vars_t.get(v).copied().unwrap_or(0) >= *cs);

        let weight_s = bank.weight(s);
        let weight_t = bank.weight(t);

        if weight_s > weight_t && s_covers_t {
            TermOrdering::Greater
        } else if weight_t > weight_s && t_covers_s {
            TermOrdering::Less
        } else if weight_s == weight_t {
            if s_covers_t && t_covers_s {
                self.compare_lex(s, t, bank)
            } else if s_covers_t {
                match self.compare_lex(s, t, bank) {
                    o @ (TermOrdering::Greater | TermOrdering::Equal) => o,
                    _ => TermOrdering::Incomparable,
                }
            } else if t_covers_s {
                match self.compare_lex(s, t, bank) {
                    o @ (TermOrdering::Less | TermOrdering::Equal) => o,
                    _ => TermOrdering::Incomparable,
                }
            } else {
                TermOrdering::Incomparable
            }
        } else {
            TermOrdering::Incomparable
        }
    }

    /// Lexicographic tie-break for terms of equal weight.
    fn compare_lex(&self, s: TermId, t: TermId, bank: &TermBank) -> TermOrdering {
        match (bank.term_data(s), bank.term_data(t)) {
            (TermData::Var(v), TermData::Var(w)) => {
                if v == w {
                    TermOrdering::Equal
                } else if v > w {
                    TermOrdering::Greater
                } else {
                    TermOrdering::Less
                }
            }
            // In the lex tie-break a variable is below any application
            (TermData::Var(_), _) => TermOrdering::Less,
            (_, TermData::Var(_)) => TermOrdering::Greater,
            (
                TermData::App { functor: f, args: fa },
                TermData::App { functor: g, args: ga },
            ) => {
                if f != g {
                    let pf = self.precedence(*f);
                    let pg = self.precedence(*g);
                    if pf > pg {
                        TermOrdering::Greater
                    } else {
                        TermOrdering::Less
                    }
                } else {
                    for (&a, &b) in fa.iter().zip(ga.iter()) {
                        match self.compare(a, b, bank) {
                            TermOrdering::Equal => continue,
                            other => return other,
                        }
                    }
                    TermOrdering::Equal
                }
            }
        }
    }

    /// Compare two literals for maximality checks: by weight under the
    /// variable condition, then predicate precedence, polarity (negative
    /// above positive), and argument-wise left to right.
    pub fn compare_literals(&self, a: LiteralId, b: LiteralId, bank: &TermBank) -> TermOrdering {
        if a == b {
            return TermOrdering::Equal;
        }
        // Every decisive branch requires the variable condition, exactly
        // as for terms.
        let mut vars_a = HashMap::new();
        let mut vars_b = HashMap::new();
        for &t in bank.literal_args(a) {
            self.count_variables(t, bank, &mut vars_a);
        }
        for &t in bank.literal_args(b) {
            self.count_variables(t, bank, &mut vars_b);
        }
        let a_covers_b = vars_b
            .iter()
            .all(|(v, cb)| vars_a.get(v).copied().unwrap_or(0) >= *cb);
        let b_covers_a = vars_a
            .iter()
            .all(|(v, ca)| vars_b.get(v).copied().unwrap_or(0) >= *ca);

        let wa = bank.literal_weight(a);
        let wb = bank.literal_weight(b);
        if wa > wb {
            return if a_covers_b {
                TermOrdering::Greater
            } else {
                TermOrdering::Incomparable
            };
        }
        if wb > wa {
            return if b_covers_a {
                TermOrdering::Less
            } else {
                TermOrdering::Incomparable
            };
        }

        let decide = |greater: bool| {
            if greater && a_covers_b {
                TermOrdering::Greater
            } else if !greater && b_covers_a {
                TermOrdering::Less
            } else {
                TermOrdering::Incomparable
            }
        };
        let (pa, pola) = bank.literal_header(a);
        let (pb, polb) = bank.literal_header(b);
        if pa != pb {
            return decide(pa > pb);
        }
        if pola != polb {
            // Negative above positive, as usual for selection
            return decide(!pola);
        }
        for (&x, &y) in bank
            .literal_args(a)
            .iter()
            .zip(bank.literal_args(b).iter())
        {
            match self.compare(x, y, bank) {
                TermOrdering::Equal => continue,
                other => return other,
            }
        }
        TermOrdering::Equal
    }
}

impl Default for KBO {
    fn default() -> Self {
        KBO::new(KBOConfig::default())
    }
}
