//! Match rows for the subsumption constraint system
//!
//! A match row records that side-premise literal `L_i` matches main-premise
//! literal `M_j` with a given polarity (positive = same polarity,
//! negative = complementary), the SAT variable standing for that choice,
//! and the binder fragment (variable bindings) the choice implies.
//!
//! Per-literal polarity presence is kept in packed two-bit states (four
//! literals per byte) so the header filters read in O(1).

use crate::fol::TermId;

/// One match row: `(i, j, polarity)` plus its SAT variable and bindings.
#[derive(Debug, Clone)]
pub struct Match {
    /// Side-premise literal index
    pub i: usize,
    /// Main-premise literal index
    pub j: usize,
    /// true = same-polarity match, false = complementary match
    pub polarity: bool,
    /// SAT variable standing for this match
    pub var: usize,
    /// Variable bindings implied by this match
    pub bindings: Vec<(u32, TermId)>,
}

/// The match rows of one subsumption problem, bucketed by `i` and by `j`.
#[derive(Debug, Default)]
pub struct MatchSet {
    matches: Vec<Match>,
    by_i: Vec<Vec<usize>>,
    by_j: Vec<Vec<usize>>,
    /// Packed two-bit polarity presence per side literal
    i_states: Vec<u8>,
    /// Packed two-bit polarity presence per main literal
    j_states: Vec<u8>,
    m: usize,
    n: usize,
}

impl MatchSet {
    pub fn new(m: usize, n: usize) -> Self {
        MatchSet {
            matches: Vec::new(),
            by_i: vec![Vec::new(); m],
            by_j: vec![Vec::new(); n],
            i_states: vec![0; m / 4 + 1],
            j_states: vec![0; n / 4 + 1],
            m,
            n,
        }
    }

    pub fn side_len(&self) -> usize {
        self.m
    }

    pub fn main_len(&self) -> usize {
        self.n
    }

    /// Add a match row; the returned SAT variable equals the row index.
    pub fn add_match(&mut self, i: usize, j: usize, polarity: bool, bindings: Vec<(u32, TermId)>) -> usize {
        debug_assert!(i < self.m && j < self.n);
        let var = self.matches.len();
        self.matches.push(Match {
            i,
            j,
            polarity,
            var,
            bindings,
        });
        self.by_i[i].push(var);
        self.by_j[j].push(var);
        if polarity {
            self.i_states[i / 4] |= 1 << (2 * (i % 4));
            self.j_states[j / 4] |= 1 << (2 * (j % 4));
        } else {
            self.i_states[i / 4] |= 2 << (2 * (i % 4));
            self.j_states[j / 4] |= 2 << (2 * (j % 4));
        }
        var
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn get(&self, var: usize) -> &Match {
        &self.matches[var]
    }

    pub fn all(&self) -> &[Match] {
        &self.matches
    }

    pub fn matches_for_i(&self, i: usize) -> impl Iterator<Item = &Match> {
        self.by_i[i].iter().map(move |&v| &self.matches[v])
    }

    pub fn matches_for_j(&self, j: usize) -> impl Iterator<Item = &Match> {
        self.by_j[j].iter().map(move |&v| &self.matches[v])
    }

    pub fn has_positive_match_i(&self, i: usize) -> bool {
        self.i_states[i / 4] & (1 << (2 * (i % 4))) != 0
    }

    pub fn has_negative_match_i(&self, i: usize) -> bool {
        self.i_states[i / 4] & (2 << (2 * (i % 4))) != 0
    }

    pub fn has_positive_match_j(&self, j: usize) -> bool {
        self.j_states[j / 4] & (1 << (2 * (j % 4))) != 0
    }

    pub fn has_negative_match_j(&self, j: usize) -> bool {
        self.j_states[j / 4] & (2 << (2 * (j % 4))) != 0
    }
}
