//! Discrimination tree over term shapes
//!
//! The trie indexes flattened preorder key paths, keeping the actual
//! variable keys (a perfect tree: a path determines the term). Queries walk
//! the trie to collect structurally compatible candidate payloads; the
//! callers (the term index below, the literal index) hand each candidate to
//! the real matcher/unifier, which computes the substitution and filters
//! false positives.
//!
//! Entries are weak references: payload plus owning clause and a generation
//! tag. Removing a clause bumps its generation, so stale entries are
//! skipped by queries and purged lazily on the next insert into their leaf.

use crate::fol::{
    are_variant_terms, try_match, unify, FunctionId, Substitution, TermBank, TermData, TermId,
};
use std::collections::HashMap;

/// Key of a single node in the flattened preorder traversal of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlatKey {
    /// Function symbol with arity (needed for skip counts)
    Sym(FunctionId, u8),
    /// A named variable
    Var(u32),
}

/// Flatten a term into preorder keys.
pub fn flatten(term: TermId, bank: &TermBank, keys: &mut Vec<FlatKey>) {
    match bank.term_data(term) {
        TermData::Var(v) => keys.push(FlatKey::Var(*v)),
        TermData::App { functor, args } => {
            keys.push(FlatKey::Sym(*functor, args.len() as u8));
            for &arg in args {
                flatten(arg, bank, keys);
            }
        }
    }
}

/// Number of flat keys the subterm starting at `pos` occupies.
fn subterm_size(keys: &[FlatKey], pos: usize) -> usize {
    match keys[pos] {
        FlatKey::Var(_) => 1,
        FlatKey::Sym(_, arity) => {
            let mut size = 1;
            for _ in 0..arity {
                size += subterm_size(keys, pos + size);
            }
            size
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct StoredEntry<P> {
    payload: P,
    clause: usize,
    generation: u32,
}

#[derive(Debug)]
struct Node<P> {
    children: HashMap<FlatKey, Node<P>>,
    entries: Vec<StoredEntry<P>>,
}

impl<P> Default for Node<P> {
    fn default() -> Self {
        Node {
            children: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

/// Payload-generic discrimination trie with generation-tagged entries.
#[derive(Debug)]
pub struct DiscTree<P: Copy> {
    root: Node<P>,
    /// Removal count per clause; entries from older generations are stale.
    generations: HashMap<usize, u32>,
    /// Live entries per clause
    counts: HashMap<usize, usize>,
    len: usize,
}

impl<P: Copy> Default for DiscTree<P> {
    fn default() -> Self {
        DiscTree {
            root: Node::default(),
            generations: HashMap::new(),
            counts: HashMap::new(),
            len: 0,
        }
    }
}

impl<P: Copy> DiscTree<P> {
    pub fn new() -> Self {
        DiscTree::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn generation(&self, clause: usize) -> u32 {
        self.generations.get(&clause).copied().unwrap_or(0)
    }

    /// Insert a payload under a flattened key path.
    pub fn insert_keys(&mut self, keys: &[FlatKey], clause: usize, payload: P) {
        let generation = self.generation(clause);
        let generations = &self.generations;
        let mut node = &mut self.root;
        for &key in keys {
            node = node.children.entry(key).or_default();
        }
        // Lazy purge of stale entries sharing this leaf
        node.entries
            .retain(|e| e.generation == generations.get(&e.clause).copied().unwrap_or(0));
        node.entries.push(StoredEntry {
            payload,
            clause,
            generation,
        });
        *self.counts.entry(clause).or_insert(0) += 1;
        self.len += 1;
    }

    /// Remove every entry of a clause by bumping its generation.
    /// After removal no query returns the clause's entries.
    pub fn remove_clause(&mut self, clause: usize) {
        *self.generations.entry(clause).or_insert(0) += 1;
        let removed = self.counts.remove(&clause).unwrap_or(0);
        self.len -= removed;
    }

    fn collect_leaf(&self, node: &Node<P>, out: &mut Vec<P>) {
        for stored in &node.entries {
            if stored.generation == self.generation(stored.clause) {
                out.push(stored.payload);
            }
        }
    }

    /// Candidates whose stored path may generalize the query keys
    /// (stored variables skip query subterms).
    pub fn candidates_generalizations(&self, keys: &[FlatKey]) -> Vec<P> {
        let mut out = Vec::new();
        self.gen_rec(&self.root, keys, 0, &mut out);
        out
    }

    fn gen_rec(&self, node: &Node<P>, keys: &[FlatKey], pos: usize, out: &mut Vec<P>) {
        if pos == keys.len() {
            self.collect_leaf(node, out);
            return;
        }
        for (key, child) in &node.children {
            match key {
                FlatKey::Var(_) => {
                    let skip = subterm_size(keys, pos);
                    self.gen_rec(child, keys, pos + skip, out);
                }
                FlatKey::Sym(..) => {
                    if *key == keys[pos] {
                        self.gen_rec(child, keys, pos + 1, out);
                    }
                }
            }
        }
    }

    /// Candidates whose stored path may be an instance of the query keys
    /// (query variables skip stored subterms).
    pub fn candidates_instances(&self, keys: &[FlatKey]) -> Vec<P> {
        let mut out = Vec::new();
        self.inst_rec(&self.root, keys, 0, &mut out);
        out
    }

    fn inst_rec(&self, node: &Node<P>, keys: &[FlatKey], pos: usize, out: &mut Vec<P>) {
        if pos == keys.len() {
            self.collect_leaf(node, out);
            return;
        }
        match keys[pos] {
            FlatKey::Var(_) => {
                let mut landing = Vec::new();
                after_one_term(node, &mut landing);
                for next in landing {
                    self.inst_rec(next, keys, pos + 1, out);
                }
            }
            key @ FlatKey::Sym(..) => {
                if let Some(child) = node.children.get(&key) {
                    self.inst_rec(child, keys, pos + 1, out);
                }
            }
        }
    }

    /// Candidates whose stored path may be a variant of the query keys
    /// (variables pair with variables, symbols match exactly).
    pub fn candidates_variants(&self, keys: &[FlatKey]) -> Vec<P> {
        let mut out = Vec::new();
        self.var_rec(&self.root, keys, 0, &mut out);
        out
    }

    fn var_rec(&self, node: &Node<P>, keys: &[FlatKey], pos: usize, out: &mut Vec<P>) {
        if pos == keys.len() {
            self.collect_leaf(node, out);
            return;
        }
        match keys[pos] {
            FlatKey::Var(_) => {
                for (key, child) in &node.children {
                    if matches!(key, FlatKey::Var(_)) {
                        self.var_rec(child, keys, pos + 1, out);
                    }
                }
            }
            key @ FlatKey::Sym(..) => {
                if let Some(child) = node.children.get(&key) {
                    self.var_rec(child, keys, pos + 1, out);
                }
            }
        }
    }

    /// Candidates whose stored path may unify with the query keys
    /// (variables on either side skip the other side's subterm).
    pub fn candidates_unifications(&self, keys: &[FlatKey]) -> Vec<P> {
        let mut out = Vec::new();
        self.unif_rec(&self.root, keys, 0, &mut out);
        out
    }

    fn unif_rec(&self, node: &Node<P>, keys: &[FlatKey], pos: usize, out: &mut Vec<P>) {
        if pos == keys.len() {
            self.collect_leaf(node, out);
            return;
        }
        match keys[pos] {
            FlatKey::Var(_) => {
                let mut landing = Vec::new();
                after_one_term(node, &mut landing);
                for next in landing {
                    self.unif_rec(next, keys, pos + 1, out);
                }
            }
            key @ FlatKey::Sym(..) => {
                for (ckey, child) in &node.children {
                    match ckey {
                        FlatKey::Var(_) => {
                            let skip = subterm_size(keys, pos);
                            self.unif_rec(child, keys, pos + skip, out);
                        }
                        FlatKey::Sym(..) => {
                            if *ckey == key {
                                self.unif_rec(child, keys, pos + 1, out);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Collect the nodes reached after consuming one complete stored term
/// starting at `node`.
fn after_one_term<'a, P>(node: &'a Node<P>, out: &mut Vec<&'a Node<P>>) {
    for (key, child) in &node.children {
        match key {
            FlatKey::Var(_) => out.push(child),
            FlatKey::Sym(_, arity) => after_n_terms(child, *arity as usize, out),
        }
    }
}

fn after_n_terms<'a, P>(node: &'a Node<P>, n: usize, out: &mut Vec<&'a Node<P>>) {
    if n == 0 {
        out.push(node);
        return;
    }
    let mut mid = Vec::new();
    after_one_term(node, &mut mid);
    for m in mid {
        after_n_terms(m, n - 1, out);
    }
}

// =============================================================================
// Term index
// =============================================================================

/// Index payload of the term index: the stored term plus its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermEntry {
    pub term: TermId,
    pub clause: usize,
    pub literal: usize,
}

/// Term index: a discrimination trie plus matcher-backed verification.
/// All queries return `(entry, substitution)` pairs.
#[derive(Debug, Default)]
pub struct TermIndex {
    tree: DiscTree<TermEntry>,
}

impl TermIndex {
    pub fn new() -> Self {
        TermIndex::default()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn insert(&mut self, term: TermId, clause: usize, literal: usize, bank: &TermBank) {
        let mut keys = Vec::new();
        flatten(term, bank, &mut keys);
        self.tree.insert_keys(
            &keys,
            clause,
            TermEntry {
                term,
                clause,
                literal,
            },
        );
    }

    pub fn remove_clause(&mut self, clause: usize) {
        self.tree.remove_clause(clause);
    }

    /// Stored terms `s` admitting σ with `σ(s) = query`.
    pub fn generalizations(
        &self,
        query: TermId,
        bank: &TermBank,
    ) -> Vec<(TermEntry, Substitution)> {
        let mut keys = Vec::new();
        flatten(query, bank, &mut keys);
        self.tree
            .candidates_generalizations(&keys)
            .into_iter()
            .filter_map(|e| try_match(e.term, query, bank).map(|s| (e, s)))
            .collect()
    }

    /// Stored terms `s` admitting σ with `σ(query) = s`.
    pub fn instances(&self, query: TermId, bank: &TermBank) -> Vec<(TermEntry, Substitution)> {
        let mut keys = Vec::new();
        flatten(query, bank, &mut keys);
        self.tree
            .candidates_instances(&keys)
            .into_iter()
            .filter_map(|e| try_match(query, e.term, bank).map(|s| (e, s)))
            .collect()
    }

    /// Stored terms equal to the query up to variable renaming. The
    /// substitution is the renaming from stored to query.
    pub fn variants(&self, query: TermId, bank: &TermBank) -> Vec<(TermEntry, Substitution)> {
        let mut keys = Vec::new();
        flatten(query, bank, &mut keys);
        self.tree
            .candidates_variants(&keys)
            .into_iter()
            .filter(|e| are_variant_terms(e.term, query, bank))
            .filter_map(|e| try_match(e.term, query, bank).map(|s| (e, s)))
            .collect()
    }

    /// Stored terms unifiable with the query. The caller guarantees the
    /// query's variables are disjoint from stored ones where that matters
    /// (generating rules rename the given clause apart first).
    pub fn unifications(&self, query: TermId, bank: &TermBank) -> Vec<(TermEntry, Substitution)> {
        let mut keys = Vec::new();
        flatten(query, bank, &mut keys);
        self.tree
            .candidates_unifications(&keys)
            .into_iter()
            .filter_map(|e| unify(e.term, query, bank).map(|s| (e, s)))
            .collect()
    }
}
