//! Propositional splitting
//!
//! A clause whose literals partition into variable-disjoint groups is
//! equivalent to the disjunction of independent components; searching the
//! components separately keeps clauses small. Ground literals are
//! singleton components. Components are grouped with union-find over the
//! shared-variable relation.

use crate::fol::{LiteralId, TermBank};

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        UnionFind {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            let root = self.find(self.parent[x]);
            self.parent[x] = root;
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

/// Split a clause into variable-disjoint components, preserving literal
/// order inside each component. A clause that does not split returns a
/// single component.
pub fn components(literals: &[LiteralId], bank: &TermBank) -> Vec<Vec<LiteralId>> {
    if literals.len() <= 1 {
        return vec![literals.to_vec()];
    }

    let vars_per_literal: Vec<Vec<u32>> = literals
        .iter()
        .map(|&lit| {
            let mut vars = Vec::new();
            bank.literal_collect_vars(lit, &mut vars);
            vars
        })
        .collect();

    let mut uf = UnionFind::new(literals.len());
    for i in 0..literals.len() {
        for j in (i + 1)..literals.len() {
            if vars_per_literal[i]
                .iter()
                .any(|v| vars_per_literal[j].contains(v))
            {
                uf.union(i, j);
            }
        }
    }

    let mut groups: Vec<(usize, Vec<LiteralId>)> = Vec::new();
    for (i, &lit) in literals.iter().enumerate() {
        let root = uf.find(i);
        match groups.iter_mut().find(|(r, _)| *r == root) {
            Some((_, group)) => group.push(lit),
            None => groups.push((root, vec![lit])),
        }
    }

    groups.into_iter().map(|(_, group)| group).collect()
}
