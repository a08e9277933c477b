//! Literal selection strategies
//!
//! Selection decides which literals of a clause are eligible for
//! generating inferences. Strategies follow Hoder et al., "Selecting the
//! selection" (2016):
//! - select all literals,
//! - select all maximal literals,
//! - select the unique maximal literal, else a max-weight negative
//!   literal, else all maximal literals (the default).
//!
//! `apply_selection` reorders the clause so the selected literals form a
//! prefix and records the count in the clause's `selected` field. It runs
//! before activation, never on an indexed clause.

use crate::fol::{Clause, LiteralId, TermBank, TermOrdering, KBO};

/// A literal selection strategy.
pub trait LiteralSelector {
    /// Indices of the selected literals.
    fn select(&self, literals: &[LiteralId], bank: &TermBank, kbo: &KBO) -> Vec<usize>;

    fn name(&self) -> &'static str;
}

/// Indices of literals not strictly below any other literal.
fn maximal_literals(literals: &[LiteralId], bank: &TermBank, kbo: &KBO) -> Vec<usize> {
    let mut maximal = Vec::new();
    for i in 0..literals.len() {
        let dominated = (0..literals.len()).any(|j| {
            i != j
                && kbo.compare_literals(literals[j], literals[i], bank) == TermOrdering::Greater
        });
        if !dominated {
            maximal.push(i);
        }
    }
    maximal
}

/// First negative literal of maximal weight, if any.
fn max_weight_negative(literals: &[LiteralId], bank: &TermBank) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (i, &lit) in literals.iter().enumerate() {
        if bank.literal_polarity(lit) {
            continue;
        }
        let w = bank.literal_weight(lit);
        if best.map_or(true, |(_, bw)| w > bw) {
            best = Some((i, w));
        }
    }
    best.map(|(i, _)| i)
}

/// Select every literal (no selection).
pub struct SelectAll;

impl LiteralSelector for SelectAll {
    fn select(&self, literals: &[LiteralId], _bank: &TermBank, _kbo: &KBO) -> Vec<usize> {
        (0..literals.len()).collect()
    }

    fn name(&self) -> &'static str {
        "select_all"
    }
}

/// Select all maximal literals under the simplification ordering.
pub struct SelectMaximal;

impl LiteralSelector for SelectMaximal {
    fn select(&self, literals: &[LiteralId], bank: &TermBank, kbo: &KBO) -> Vec<usize> {
        maximal_literals(literals, bank, kbo)
    }

    fn name(&self) -> &'static str {
        "select_maximal"
    }
}

/// Unique maximal literal, else max-weight negative, else all maximal.
pub struct SelectUniqueMaximalOrNegOrMaximal;

impl LiteralSelector for SelectUniqueMaximalOrNegOrMaximal {
    fn select(&self, literals: &[LiteralId], bank: &TermBank, kbo: &KBO) -> Vec<usize> {
        let maximal = maximal_literals(literals, bank, kbo);
        if maximal.len() == 1 {
            return maximal;
        }
        if let Some(neg) = max_weight_negative(literals, bank) {
            return vec![neg];
        }
        maximal
    }

    fn name(&self) -> &'static str {
        "select_unique_maximal_or_neg_or_maximal"
    }
}

/// Reorder the clause so the selected literals form a prefix and set the
/// `selected` count.
pub fn apply_selection(
    clause: &mut Clause,
    selector: &dyn LiteralSelector,
    bank: &TermBank,
    kbo: &KBO,
) {
    let selected = selector.select(&clause.literals, bank, kbo);
    let mut reordered = Vec::with_capacity(clause.literals.len());
    for &i in &selected {
        reordered.push(clause.literals[i]);
    }
    for (i, &lit) in clause.literals.iter().enumerate() {
        if !selected.contains(&i) {
            reordered.push(lit);
        }
    }
    clause.literals = reordered;
    clause.selected = selected.len();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::{ClauseRole, TermId};

    struct TestContext {
        bank: TermBank,
    }

    impl TestContext {
        fn new() -> Self {
            TestContext {
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

        fn func(&mut self, name: &str, args: Vec<TermId>) -> TermId {
            let id = self
                .bank
                .signature
                .add_plain_function(name, args.len() as u8);
            self.bank.app(id, args)
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
    fn test_select_all() {
        let mut ctx = TestContext::new();
        let a = ctx.const_("a");
        let l0 = ctx.lit("p", true, vec![a]);
        let l1 = ctx.lit("q", false, vec![a]);

        let selected = SelectAll.select(&[l0, l1], &ctx.bank, &KBO::default());
        assert_eq!(selected, vec![0, 1]);
    }

    #[test]
    fn test_select_maximal_prefers_heavy_literal() {
        let mut ctx = TestContext::new();
        let a = ctx.const_("a");
        let ga = ctx.func("g", vec![a]);
        let fga = ctx.func("f", vec![ga]);
        let l0 = ctx.lit("p", true, vec![a]);
        let l1 = ctx.lit("q", true, vec![fga]);

        // q(f(g(a))) outweighs p(a): it is the only maximal literal
        let selected = SelectMaximal.select(&[l0, l1], &ctx.bank, &KBO::default());
        assert_eq!(selected, vec![1]);
    }

    #[test]
    fn test_incomparable_literals_both_maximal() {
        let mut ctx = TestContext::new();
        let x = ctx.var(0);
        let a = ctx.const_("a");
        let ga = ctx.func("g", vec![a]);
        let fga = ctx.func("f", vec![ga]);
        let l0 = ctx.lit("p", true, vec![x]);
        let l1 = ctx.lit("q", true, vec![fga]);

        // q does not contain X, so the variable condition blocks q > p
        let selected = SelectMaximal.select(&[l0, l1], &ctx.bank, &KBO::default());
        assert_eq!(selected, vec![0, 1]);
    }

    #[test]
    fn test_default_falls_back_to_negative() {
        let mut ctx = TestContext::new();
        let x = ctx.var(0);
        let y = ctx.var(1);
        let fx = ctx.func("f", vec![x]);
        let fy = ctx.func("f", vec![y]);
        let c = ctx.const_("c");

        // p(f(X)) and q(f(Y)) are incomparable; ~r(c) is picked instead
        let l0 = ctx.lit("p", true, vec![fx]);
        let l1 = ctx.lit("q", true, vec![fy]);
        let l2 = ctx.lit("r", false, vec![c]);

        let selected =
            SelectUniqueMaximalOrNegOrMaximal.select(&[l0, l1, l2], &ctx.bank, &KBO::default());
        assert_eq!(selected, vec![2]);
    }

    #[test]
    fn test_apply_selection_reorders_prefix() {
        let mut ctx = TestContext::new();
        let x = ctx.var(0);
        let y = ctx.var(1);
        let fx = ctx.func("f", vec![x]);
        let fy = ctx.func("f", vec![y]);
        let c = ctx.const_("c");

        let l0 = ctx.lit("p", true, vec![fx]);
        let l1 = ctx.lit("q", true, vec![fy]);
        let l2 = ctx.lit("r", false, vec![c]);

        let mut clause = Clause::input(vec![l0, l1, l2], ClauseRole::Axiom, &ctx.bank);
        let kbo = KBO::default();
        apply_selection(
            &mut clause,
            &SelectUniqueMaximalOrNegOrMaximal,
            &ctx.bank,
            &kbo,
        );

        assert_eq!(clause.selected, 1);
        assert_eq!(clause.literals, vec![l2, l0, l1]);
        assert_eq!(clause.selected_literals(), &[l2]);
    }
}
