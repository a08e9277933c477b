//! Forward subsumption and subsumption resolution
//!
//! Both decisions are encoded as a match-compatibility constraint system.
//! For side premise `D` (literals `L_i`) and main premise `C` (literals
//! `M_j`), a Boolean variable stands for every way some `L_i` can match
//! some `M_j` (directly, or with the commutative swap for equality), with
//! positive polarity (same sign) or negative polarity (complementary).
//! Each variable carries the binder fragment its choice implies.
//!
//! Constraints:
//! - every `L_i` has at least one true variable,
//! - simultaneously true variables must have compatible binders (enforced
//!   by the binder theory attached to the SAT solver, not encoded in CNF),
//! - subsumption uses positive variables only, plus at-most-one per `M_j`
//!   so the mapping is a multiset embedding,
//! - subsumption resolution additionally requires at least one negative
//!   variable and that all true negative variables agree on a single `M_j`
//!   (pairwise exclusion of different-`j` negatives).
//!
//! Header-based fast filters run before any variable is created: a side
//! literal with no compatible partner at all refutes the attempt outright,
//! and for SR the intersection of negative-match columns over the
//! positive-match-less side literals must stay nonempty.

pub mod match_set;
pub mod solver;

pub use match_set::{Match, MatchSet};
pub use solver::{Lit, NoTheory, SatSolver, Theory};

use crate::fol::{Binder, LiteralId, Substitution, TermBank, TermId};
use std::collections::HashMap;

/// Binder theory: merges the binder fragments of true match variables and
/// vetoes assignments whose bindings contradict an earlier choice.
struct BinderTheory<'a> {
    matches: &'a MatchSet,
    /// variable index -> (bound term, owning match variable)
    bound: HashMap<u32, (TermId, usize)>,
    /// per match variable: the bindings it introduced
    trails: Vec<Vec<u32>>,
}

impl<'a> BinderTheory<'a> {
    fn new(matches: &'a MatchSet) -> Self {
        let len = matches.len();
        BinderTheory {
            matches,
            bound: HashMap::new(),
            trails: vec![Vec::new(); len],
        }
    }
}

impl Theory for BinderTheory<'_> {
    fn assert_true(&mut self, var: usize) -> Result<(), usize> {
        let mut newly = Vec::new();
        for &(v, t) in &self.matches.get(var).bindings {
            match self.bound.get(&v) {
                Some(&(existing, owner)) => {
                    if existing != t {
                        // Roll back the partial merge before reporting
                        for u in newly {
                            self.bound.remove(&u);
                        }
                        return Err(owner);
                    }
                }
                None => {
                    self.bound.insert(v, (t, var));
                    newly.push(v);
                }
            }
        }
        self.trails[var] = newly;
        Ok(())
    }

    fn retract(&mut self, var: usize) {
        for v in self.trails[var].drain(..) {
            self.bound.remove(&v);
        }
    }
}

/// One-sided argument match between two literals with a fixed polarity
/// relation; `reversed` swaps the subject's equality arguments.
fn args_match(
    pattern: LiteralId,
    subject: LiteralId,
    reversed: bool,
    bank: &TermBank,
    subst: &mut Substitution,
    binder: &mut Binder,
) -> bool {
    let pargs = bank.literal_args(pattern);
    let sargs = bank.literal_args(subject);
    if pargs.len() != sargs.len() {
        return false;
    }
    if reversed {
        crate::fol::match_term(pargs[0], sargs[1], subst, binder, bank)
            && crate::fol::match_term(pargs[1], sargs[0], subst, binder, bank)
    } else {
        pargs
            .iter()
            .zip(sargs.iter())
            .all(|(&p, &s)| crate::fol::match_term(p, s, subst, binder, bank))
    }
}

/// Attempt one `(i, j, swap)` match; on success return the binder fragment.
fn try_single_match(
    pattern: LiteralId,
    subject: LiteralId,
    reversed: bool,
    bank: &TermBank,
) -> Option<Vec<(u32, TermId)>> {
    let mut subst = Substitution::new();
    let mut binder = Binder::new();
    if args_match(pattern, subject, reversed, bank, &mut subst, &mut binder) {
        Some(subst.iter().collect())
    } else {
        None
    }
}

/// Sorted intersection, in place (both inputs sorted ascending).
fn intersect(first: &mut Vec<usize>, second: &[usize]) {
    let mut result = Vec::with_capacity(first.len());
    let (mut i, mut j) = (0, 0);
    while i < first.len() && j < second.len() {
        match first[i].cmp(&second[j]) {
            std::cmp::Ordering::Equal => {
                result.push(first[i]);
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }
    *first = result;
}

/// The subsumption / subsumption-resolution engine. Holds no state across
/// queries; a fresh match set and solver are built per decision (the
/// constraint systems are tiny).
#[derive(Debug, Default)]
pub struct SubsumptionEngine;

impl SubsumptionEngine {
    pub fn new() -> Self {
        SubsumptionEngine
    }

    /// Collect the match rows for `side` against `main`.
    ///
    /// With `with_negative` false (plain subsumption) only same-polarity
    /// rows are built, and any side literal without a positive match
    /// aborts. With it true (SR), complementary rows are also built and
    /// the SR-specific fast filters are applied. Returns None when the
    /// fast filters already refute the attempt.
    fn fill_matches(
        &self,
        side: &[LiteralId],
        main: &[LiteralId],
        with_negative: bool,
        bank: &TermBank,
    ) -> Option<MatchSet> {
        let mut matches = MatchSet::new(side.len(), main.len());

        // SR filter state: columns negatively matched by every
        // positive-match-less side literal so far
        let mut intersection: Option<Vec<usize>> = None;
        let mut last_header: Option<(crate::fol::PredicateId, bool)> = None;
        let mut has_negative = false;

        for (i, &li) in side.iter().enumerate() {
            let (pred, polarity) = bank.literal_header(li);
            let commutative = bank.is_equality(li);
            let mut found_positive = false;
            let mut negative_columns: Vec<usize> = Vec::new();

            for (j, &mj) in main.iter().enumerate() {
                let (mpred, mpolarity) = bank.literal_header(mj);
                // Header compatibility: same predicate in either polarity
                if pred != mpred {
                    continue;
                }
                if polarity == mpolarity {
                    if let Some(bindings) = try_single_match(li, mj, false, bank) {
                        matches.add_match(i, j, true, bindings);
                        found_positive = true;
                    }
                    if commutative {
                        if let Some(bindings) = try_single_match(li, mj, true, bank) {
                            matches.add_match(i, j, true, bindings);
                            found_positive = true;
                        }
                    }
                } else if with_negative {
                    if let Some(bindings) = try_single_match(li, mj, false, bank) {
                        matches.add_match(i, j, false, bindings);
                        if negative_columns.last() != Some(&j) {
                            negative_columns.push(j);
                        }
                        has_negative = true;
                    }
                    if commutative {
                        if let Some(bindings) = try_single_match(li, mj, true, bank) {
                            matches.add_match(i, j, false, bindings);
                            if negative_columns.last() != Some(&j) {
                                negative_columns.push(j);
                            }
                            has_negative = true;
                        }
                    }
                }
            }

            if !found_positive {
                if !with_negative {
                    // Plain subsumption: every side literal needs a
                    // positive partner
                    return None;
                }
                // SR: this literal can only be the resolved one; all such
                // literals must share a header and a common column
                match last_header {
                    None => {
                        last_header = Some((pred, polarity));
                        if negative_columns.is_empty() {
                            return None;
                        }
                        intersection = Some(negative_columns);
                        continue;
                    }
                    Some(header) => {
                        if header != (pred, polarity) {
                            return None;
                        }
                    }
                }
                if !matches.has_negative_match_i(i) {
                    return None;
                }
                if let Some(inter) = intersection.as_mut() {
                    intersect(inter, &negative_columns);
                    if inter.is_empty() {
                        return None;
                    }
                }
            }
        }

        if with_negative && !has_negative {
            return None;
        }

        Some(matches)
    }

    /// Does `side` subsume `main`: is there σ with σ(side) ⊆ main as a
    /// multiset?
    pub fn subsumes(&mut self, side: &[LiteralId], main: &[LiteralId], bank: &TermBank) -> bool {
        if side.is_empty() {
            return true;
        }
        if side.len() > main.len() {
            return false;
        }

        let matches = match self.fill_matches(side, main, false, bank) {
            Some(m) => m,
            None => return false,
        };

        let mut solver = SatSolver::new(matches.len());
        // Every side literal is matched somewhere
        for i in 0..side.len() {
            let row: Vec<Lit> = matches.matches_for_i(i).map(|m| Lit::pos(m.var)).collect();
            solver.add_clause(row);
        }
        // Multiset embedding: each main literal absorbs at most one
        for j in 0..main.len() {
            let col: Vec<usize> = matches.matches_for_j(j).map(|m| m.var).collect();
            if col.len() > 1 {
                solver.add_at_most_one(&col);
            }
        }

        let mut theory = BinderTheory::new(&matches);
        solver.solve(&mut theory).is_some()
    }

    /// Subsumption resolution: find σ and a main literal `M_j` such that
    /// every side literal positively matches some main literal except for
    /// those matching `¬M_j`. The conclusion is `main` without `M_j`.
    /// Returns the conclusion literals and the resolved position.
    pub fn subsumption_resolution(
        &mut self,
        side: &[LiteralId],
        main: &[LiteralId],
        bank: &TermBank,
    ) -> Option<(Vec<LiteralId>, usize)> {
        if side.is_empty() || main.len() < side.len() {
            return None;
        }

        let matches = self.fill_matches(side, main, true, bank)?;

        let mut solver = SatSolver::new(matches.len());

        // At least one negative match is chosen
        let negatives: Vec<&Match> = matches.all().iter().filter(|m| !m.polarity).collect();
        solver.add_clause(negatives.iter().map(|m| Lit::pos(m.var)).collect());

        // Every side literal is matched somewhere (positively or
        // negatively)
        for i in 0..side.len() {
            let row: Vec<Lit> = matches.matches_for_i(i).map(|m| Lit::pos(m.var)).collect();
            solver.add_clause(row);
        }

        // All chosen negative matches agree on one main literal
        for (k, a) in negatives.iter().enumerate() {
            for b in &negatives[k + 1..] {
                if a.j != b.j {
                    solver.add_clause(vec![Lit::neg(a.var), Lit::neg(b.var)]);
                }
            }
        }

        let mut theory = BinderTheory::new(&matches);
        let model = solver.solve(&mut theory)?;

        // The resolved literal: lowest main position among the true
        // negative matches (they agree on one j by construction; the
        // minimum makes the policy explicit and testable)
        let resolved = matches
            .all()
            .iter()
            .filter(|m| !m.polarity && model[m.var])
            .map(|m| m.j)
            .min()
            .expect("model satisfies the at-least-one-negative clause");

        let conclusion: Vec<LiteralId> = main
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != resolved)
            .map(|(_, &lit)| lit)
            .collect();
        Some((conclusion, resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestCtx {
        bank: TermBank,
    }

    impl TestCtx {
        fn new() -> Self {
            TestCtx {
                bank: TermBank::new(),
            }
        }

        fn var(&mut self, index: u32) -> TermId {
            self.bank.var(index)
        }

        fn const_(&mut self, name: &str) -> TermId {
            let id = self.bank.signature.add_plain_function(name, 0);
            self.bank.constant(id)
        }

        fn lit(&mut self, pred: &str, positive: bool, args: Vec<TermId>) -> LiteralId {
            let p = self
                .bank
                .signature
                .add_plain_predicate(pred, args.len() as u8);
            self.bank.literal(p, positive, args)
        }
    }

    #[test]
    fn test_basic_subsumption() {
        let mut ctx = TestCtx::new();
        let x = ctx.var(0);
        let a = ctx.const_("a");

        // {p(X), q(X)} subsumes {p(a), q(a), r(a)}
        let px = ctx.lit("p", true, vec![x]);
        let qx = ctx.lit("q", true, vec![x]);
        let pa = ctx.lit("p", true, vec![a]);
        let qa = ctx.lit("q", true, vec![a]);
        let ra = ctx.lit("r", true, vec![a]);

        let mut engine = SubsumptionEngine::new();
        assert!(engine.subsumes(&[px, qx], &[pa, qa, ra], &ctx.bank));
        // ... and not the other way around
        assert!(!engine.subsumes(&[pa, qa, ra], &[px, qx], &ctx.bank));
    }

    #[test]
    fn test_incompatible_bindings_rejected() {
        let mut ctx = TestCtx::new();
        let x = ctx.var(0);
        let a = ctx.const_("a");
        let b = ctx.const_("b");

        // {p(X), q(X)} does not subsume {p(a), q(b)}: X cannot be both
        let px = ctx.lit("p", true, vec![x]);
        let qx = ctx.lit("q", true, vec![x]);
        let pa = ctx.lit("p", true, vec![a]);
        let qb = ctx.lit("q", true, vec![b]);

        let mut engine = SubsumptionEngine::new();
        assert!(!engine.subsumes(&[px, qx], &[pa, qb], &ctx.bank));

        // ... but subsumes {p(a), q(b), q(a)} through the second q
        let qa = ctx.lit("q", true, vec![a]);
        assert!(engine.subsumes(&[px, qx], &[pa, qb, qa], &ctx.bank));
    }

    #[test]
    fn test_multiset_semantics() {
        let mut ctx = TestCtx::new();
        let x = ctx.var(0);
        let y = ctx.var(1);
        let a = ctx.const_("a");

        // {p(X), p(Y)} must not subsume the single-literal {p(a)}
        let px = ctx.lit("p", true, vec![x]);
        let py = ctx.lit("p", true, vec![y]);
        let pa = ctx.lit("p", true, vec![a]);

        let mut engine = SubsumptionEngine::new();
        assert!(!engine.subsumes(&[px, py], &[pa], &ctx.bank));

        let b = ctx.const_("b");
        let pb = ctx.lit("p", true, vec![b]);
        assert!(engine.subsumes(&[px, py], &[pa, pb], &ctx.bank));
    }

    #[test]
    fn test_header_filter_short_circuit() {
        let mut ctx = TestCtx::new();
        let x = ctx.var(0);
        let a = ctx.const_("a");

        // No positive-compatible header for q(X) in the main clause
        let px = ctx.lit("p", true, vec![x]);
        let qx = ctx.lit("q", true, vec![x]);
        let pa = ctx.lit("p", true, vec![a]);
        let ra = ctx.lit("r", true, vec![a]);

        let mut engine = SubsumptionEngine::new();
        assert!(!engine.subsumes(&[px, qx], &[pa, ra], &ctx.bank));
    }

    #[test]
    fn test_commutative_equality_subsumption() {
        let mut ctx = TestCtx::new();
        let x = ctx.var(0);
        let y = ctx.var(1);
        let a = ctx.const_("a");
        let b = ctx.const_("b");
        let fa = {
            let f = ctx.bank.signature.add_plain_function("f", 1);
            ctx.bank.app(f, vec![a])
        };

        // X = Y subsumes any equality; the swap is also exercised
        let xy = ctx.bank.equality(true, x, y);
        let eq = ctx.bank.equality(true, fa, b);

        let mut engine = SubsumptionEngine::new();
        assert!(engine.subsumes(&[xy], &[eq], &ctx.bank));
    }

    #[test]
    fn test_subsumption_resolution_basic() {
        let mut ctx = TestCtx::new();
        let x = ctx.var(0);
        let a = ctx.const_("a");

        // Side {~p(X), q(X)}, main {p(a), q(a), r(a)}:
        // conclusion {q(a), r(a)}
        let npx = ctx.lit("p", false, vec![x]);
        let qx = ctx.lit("q", true, vec![x]);
        let pa = ctx.lit("p", true, vec![a]);
        let qa = ctx.lit("q", true, vec![a]);
        let ra = ctx.lit("r", true, vec![a]);

        let mut engine = SubsumptionEngine::new();
        let (conclusion, resolved) = engine
            .subsumption_resolution(&[npx, qx], &[pa, qa, ra], &ctx.bank)
            .expect("SR applies");
        assert_eq!(resolved, 0);
        assert_eq!(conclusion, vec![qa, ra]);
    }

    #[test]
    fn test_subsumption_resolution_needs_positive_cover() {
        let mut ctx = TestCtx::new();
        let x = ctx.var(0);
        let a = ctx.const_("a");

        // Side {~p(X), s(X)}: s(X) has no positive partner, so SR fails
        let npx = ctx.lit("p", false, vec![x]);
        let sx = ctx.lit("s", true, vec![x]);
        let pa = ctx.lit("p", true, vec![a]);
        let qa = ctx.lit("q", true, vec![a]);

        let mut engine = SubsumptionEngine::new();
        assert!(engine
            .subsumption_resolution(&[npx, sx], &[pa, qa], &ctx.bank)
            .is_none());
    }

    #[test]
    fn test_subsumption_resolution_single_conflict_column() {
        let mut ctx = TestCtx::new();
        let x = ctx.var(0);
        let a = ctx.const_("a");
        let b = ctx.const_("b");

        // Side {~p(X), ~p(b)} against main {p(a), p(b)}: the two negative
        // literals must resolve against one single main literal; only
        // X := b makes both hit p(b).
        let npx = ctx.lit("p", false, vec![x]);
        let npb = ctx.lit("p", false, vec![b]);
        let pa = ctx.lit("p", true, vec![a]);
        let pb = ctx.lit("p", true, vec![b]);

        let mut engine = SubsumptionEngine::new();
        let (conclusion, resolved) = engine
            .subsumption_resolution(&[npx, npb], &[pa, pb], &ctx.bank)
            .expect("SR applies via p(b)");
        assert_eq!(resolved, 1);
        assert_eq!(conclusion, vec![pa]);
    }

    #[test]
    fn sr_resolves_first_candidate_literal() {
        let mut ctx = TestCtx::new();
        let x = ctx.var(0);
        let a = ctx.const_("a");
        let b = ctx.const_("b");

        // Side {~p(X)} against main {p(a), p(b)}: both columns qualify;
        // the policy removes the first (lowest j)
        let npx = ctx.lit("p", false, vec![x]);
        let pa = ctx.lit("p", true, vec![a]);
        let pb = ctx.lit("p", true, vec![b]);

        let mut engine = SubsumptionEngine::new();
        let (conclusion, resolved) = engine
            .subsumption_resolution(&[npx], &[pa, pb], &ctx.bank)
            .expect("SR applies");
        assert_eq!(resolved, 0);
        assert_eq!(conclusion, vec![pb]);
    }

    #[test]
    fn test_sr_impossible_without_negative_match() {
        let mut ctx = TestCtx::new();
        let x = ctx.var(0);
        let a = ctx.const_("a");

        let px = ctx.lit("p", true, vec![x]);
        let pa = ctx.lit("p", true, vec![a]);

        let mut engine = SubsumptionEngine::new();
        assert!(engine
            .subsumption_resolution(&[px], &[pa], &ctx.bank)
            .is_none());
    }

    #[test]
    fn test_empty_side_subsumes() {
        let mut ctx = TestCtx::new();
        let a = ctx.const_("a");
        let pa = ctx.lit("p", true, vec![a]);
        let mut engine = SubsumptionEngine::new();
        assert!(engine.subsumes(&[], &[pa], &ctx.bank));
    }
}
