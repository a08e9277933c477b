//! Symbol table for sorts, functions and predicates
//!
//! Symbols are interned to small ids that replace string names everywhere in
//! the prover:
//! - O(1) comparison and hashing (u32 vs String)
//! - Copy semantics (no heap allocation on clone)
//!
//! Each symbol kind has its own id type:
//! - `SortId` for sorts
//! - `FunctionId` for function symbols (constants are 0-ary functions)
//! - `PredicateId` for predicate symbols
//!
//! The signature also carries per-symbol metadata the rest of the prover
//! depends on: arity, sort signature, KBO weight, and the skolem /
//! constructor / commutative / interpreted-arithmetic flags.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Id of an interned sort
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SortId(pub(crate) u32);

/// Id of an interned function symbol
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub(crate) u32);

/// Id of an interned predicate symbol
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PredicateId(pub(crate) u32);

impl SortId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl FunctionId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl PredicateId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Built-in sort kinds. Arithmetic sorts get interpreted treatment in the
/// polynomial normalizer; everything else is uninterpreted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuiltinSort {
    /// Default sort of uninterpreted individuals
    Individual,
    Integer,
    Rational,
    Real,
}

impl BuiltinSort {
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BuiltinSort::Integer | BuiltinSort::Rational | BuiltinSort::Real
        )
    }
}

#[derive(Debug, Clone)]
struct SortEntry {
    name: String,
    kind: BuiltinSort,
}

#[derive(Debug, Clone)]
struct FunctionEntry {
    name: String,
    arity: u8,
    arg_sorts: Vec<SortId>,
    result_sort: SortId,
    /// KBO weight of the symbol
    weight: u32,
    skolem: bool,
    constructor: bool,
    commutative: bool,
    interpreted: Option<ArithFunction>,
    /// Value for interned integer numerals
    numeral: Option<i32>,
}

#[derive(Debug, Clone)]
struct PredicateEntry {
    name: String,
    arity: u8,
    arg_sorts: Vec<SortId>,
    commutative: bool,
    interpreted: Option<ArithPredicate>,
}

/// Interpreted arithmetic function symbols
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArithFunction {
    Sum,
    Product,
    UnaryMinus,
}

/// Interpreted arithmetic predicate symbols
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArithPredicate {
    Greater,
    Less,
}

/// Symbol table for first-order logic with sorts.
///
/// Owned by the `TermBank`; passed by reference where only names and
/// metadata are needed.
#[derive(Debug, Clone)]
pub struct Signature {
    sorts: Vec<SortEntry>,
    sort_lookup: HashMap<String, SortId>,
    functions: Vec<FunctionEntry>,
    function_lookup: HashMap<String, FunctionId>,
    predicates: Vec<PredicateEntry>,
    predicate_lookup: HashMap<String, PredicateId>,
    numeral_lookup: HashMap<i32, FunctionId>,
    /// The distinguished equality predicate, interned eagerly
    equality: PredicateId,
    /// Default sort, interned eagerly
    default_sort: SortId,
    integer_sort: SortId,
    skolem_counter: u32,
}

impl Signature {
    pub fn new() -> Self {
        let mut sig = Signature {
            sorts: Vec::new(),
            sort_lookup: HashMap::new(),
            functions: Vec::new(),
            function_lookup: HashMap::new(),
            predicates: Vec::new(),
            predicate_lookup: HashMap::new(),
            numeral_lookup: HashMap::new(),
            equality: PredicateId(0),
            default_sort: SortId(0),
            integer_sort: SortId(0),
            skolem_counter: 0,
        };
        sig.default_sort = sig.add_sort("$i", BuiltinSort::Individual);
        sig.integer_sort = sig.add_sort("$int", BuiltinSort::Integer);
        let d = sig.default_sort;
        sig.equality = sig.add_predicate("=", &[d, d]);
        sig.predicates[0].commutative = true;
        sig
    }

    // === Sorts ===

    /// Intern a sort, returning its id (get-or-create).
    pub fn add_sort(&mut self, name: &str, kind: BuiltinSort) -> SortId {
        if let Some(&id) = self.sort_lookup.get(name) {
            return id;
        }
        let id = SortId(self.sorts.len() as u32);
        self.sorts.push(SortEntry {
            name: name.to_string(),
            kind,
        });
        self.sort_lookup.insert(name.to_string(), id);
        id
    }

    pub fn sort_name(&self, id: SortId) -> &str {
        &self.sorts[id.0 as usize].name
    }

    pub fn sort_is_arithmetic(&self, id: SortId) -> bool {
        self.sorts[id.0 as usize].kind.is_arithmetic()
    }

    pub fn default_sort(&self) -> SortId {
        self.default_sort
    }

    pub fn integer_sort(&self) -> SortId {
        self.integer_sort
    }

    pub fn sort_count(&self) -> usize {
        self.sorts.len()
    }

    // === Functions ===

    /// Intern a function symbol with the given argument and result sorts
    /// (get-or-create). A re-interned name keeps its original signature.
    pub fn add_function(&mut self, name: &str, arg_sorts: &[SortId], result: SortId) -> FunctionId {
        if let Some(&id) = self.function_lookup.get(name) {
            return id;
        }
        let id = FunctionId(self.functions.len() as u32);
        self.functions.push(FunctionEntry {
            name: name.to_string(),
            arity: arg_sorts.len() as u8,
            arg_sorts: arg_sorts.to_vec(),
            result_sort: result,
            weight: 1,
            skolem: false,
            constructor: false,
            commutative: false,
            interpreted: None,
            numeral: None,
        });
        self.function_lookup.insert(name.to_string(), id);
        id
    }

    /// Shorthand for uninterpreted symbols over the default sort.
    pub fn add_plain_function(&mut self, name: &str, arity: u8) -> FunctionId {
        let d = self.default_sort;
        let args = vec![d; arity as usize];
        self.add_function(name, &args, d)
    }

    /// Intern a fresh skolem symbol over the given argument sorts.
    pub fn add_skolem(&mut self, arg_sorts: &[SortId], result: SortId) -> FunctionId {
        let name = format!("sk{}", self.skolem_counter);
        self.skolem_counter += 1;
        let id = self.add_function(&name, arg_sorts, result);
        self.functions[id.0 as usize].skolem = true;
        id
    }

    /// Intern the per-sort blank constant used by induction deduplication.
    pub fn blank_constant(&mut self, sort: SortId, occurrence: u32) -> FunctionId {
        let name = format!("blank_{}_{}", sort.0, occurrence);
        self.add_function(&name, &[], sort)
    }

    /// Intern an integer numeral constant.
    pub fn numeral(&mut self, value: i32) -> FunctionId {
        if let Some(&id) = self.numeral_lookup.get(&value) {
            return id;
        }
        let int = self.integer_sort;
        let id = self.add_function(&value.to_string(), &[], int);
        self.functions[id.0 as usize].numeral = Some(value);
        self.numeral_lookup.insert(value, id);
        id
    }

    /// Recover the value of an interned numeral, if `f` is one.
    pub fn numeral_value(&self, f: FunctionId) -> Option<i32> {
        self.functions[f.0 as usize].numeral
    }

    pub fn function_name(&self, id: FunctionId) -> &str {
        &self.functions[id.0 as usize].name
    }

    pub fn function_arity(&self, id: FunctionId) -> u8 {
        self.functions[id.0 as usize].arity
    }

    pub fn function_result_sort(&self, id: FunctionId) -> SortId {
        self.functions[id.0 as usize].result_sort
    }

    pub fn function_arg_sorts(&self, id: FunctionId) -> &[SortId] {
        &self.functions[id.0 as usize].arg_sorts
    }

    pub fn function_weight(&self, id: FunctionId) -> u32 {
        self.functions[id.0 as usize].weight
    }

    pub fn set_function_weight(&mut self, id: FunctionId, weight: u32) {
        assert!(weight >= 1, "KBO symbol weight must be positive");
        self.functions[id.0 as usize].weight = weight;
    }

    pub fn is_skolem(&self, id: FunctionId) -> bool {
        self.functions[id.0 as usize].skolem
    }

    pub fn mark_skolem(&mut self, id: FunctionId) {
        self.functions[id.0 as usize].skolem = true;
    }

    pub fn is_constructor(&self, id: FunctionId) -> bool {
        self.functions[id.0 as usize].constructor
    }

    pub fn mark_constructor(&mut self, id: FunctionId) {
        self.functions[id.0 as usize].constructor = true;
    }

    pub fn function_is_commutative(&self, id: FunctionId) -> bool {
        self.functions[id.0 as usize].commutative
    }

    pub fn arith_function(&self, id: FunctionId) -> Option<ArithFunction> {
        self.functions[id.0 as usize].interpreted
    }

    pub fn get_function(&self, name: &str) -> Option<FunctionId> {
        self.function_lookup.get(name).copied()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Intern the interpreted arithmetic function symbols ($sum, $product,
    /// $uminus). Idempotent.
    pub fn interpret_arithmetic(&mut self) -> ArithSymbols {
        let int = self.integer_sort;
        let sum = self.add_function("$sum", &[int, int], int);
        let product = self.add_function("$product", &[int, int], int);
        let uminus = self.add_function("$uminus", &[int], int);
        self.functions[sum.0 as usize].interpreted = Some(ArithFunction::Sum);
        self.functions[sum.0 as usize].commutative = true;
        self.functions[product.0 as usize].interpreted = Some(ArithFunction::Product);
        self.functions[product.0 as usize].commutative = true;
        self.functions[uminus.0 as usize].interpreted = Some(ArithFunction::UnaryMinus);
        let greater = self.add_predicate("$greater", &[int, int]);
        let less = self.add_predicate("$less", &[int, int]);
        self.predicates[greater.0 as usize].interpreted = Some(ArithPredicate::Greater);
        self.predicates[less.0 as usize].interpreted = Some(ArithPredicate::Less);
        ArithSymbols {
            sum,
            product,
            uminus,
            greater,
            less,
        }
    }

    // === Predicates ===

    /// Intern a predicate symbol (get-or-create).
    pub fn add_predicate(&mut self, name: &str, arg_sorts: &[SortId]) -> PredicateId {
        if let Some(&id) = self.predicate_lookup.get(name) {
            return id;
        }
        let id = PredicateId(self.predicates.len() as u32);
        self.predicates.push(PredicateEntry {
            name: name.to_string(),
            arity: arg_sorts.len() as u8,
            arg_sorts: arg_sorts.to_vec(),
            commutative: false,
            interpreted: None,
        });
        self.predicate_lookup.insert(name.to_string(), id);
        id
    }

    pub fn add_plain_predicate(&mut self, name: &str, arity: u8) -> PredicateId {
        let d = self.default_sort;
        let args = vec![d; arity as usize];
        self.add_predicate(name, &args)
    }

    pub fn predicate_name(&self, id: PredicateId) -> &str {
        &self.predicates[id.0 as usize].name
    }

    pub fn predicate_arity(&self, id: PredicateId) -> u8 {
        self.predicates[id.0 as usize].arity
    }

    pub fn predicate_arg_sorts(&self, id: PredicateId) -> &[SortId] {
        &self.predicates[id.0 as usize].arg_sorts
    }

    pub fn predicate_is_commutative(&self, id: PredicateId) -> bool {
        self.predicates[id.0 as usize].commutative
    }

    pub fn arith_predicate(&self, id: PredicateId) -> Option<ArithPredicate> {
        self.predicates[id.0 as usize].interpreted
    }

    pub fn get_predicate(&self, name: &str) -> Option<PredicateId> {
        self.predicate_lookup.get(name).copied()
    }

    pub fn equality(&self) -> PredicateId {
        self.equality
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles to the interpreted arithmetic symbols.
#[derive(Debug, Copy, Clone)]
pub struct ArithSymbols {
    pub sum: FunctionId,
    pub product: FunctionId,
    pub uminus: FunctionId,
    pub greater: PredicateId,
    pub less: PredicateId,
}

// === Display implementations for debugging ===

impl fmt::Display for SortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

impl fmt::Display for PredicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

// === Serde implementations ===
// Ids serialize as bare u32 for compact storage.

impl Serialize for FunctionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FunctionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(FunctionId)
    }
}

impl Serialize for PredicateId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PredicateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(PredicateId)
    }
}

impl Serialize for SortId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SortId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(SortId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_interning() {
        let mut sig = Signature::new();

        let f = sig.add_plain_function("f", 2);
        let g = sig.add_plain_function("g", 1);
        let f2 = sig.add_plain_function("f", 2);

        assert_eq!(f, f2);
        assert_ne!(f, g);
        assert_eq!(sig.function_name(f), "f");
        assert_eq!(sig.function_arity(f), 2);
    }

    #[test]
    fn test_predicate_interning() {
        let mut sig = Signature::new();

        let p = sig.add_plain_predicate("p", 1);
        let q = sig.add_plain_predicate("q", 1);
        let p2 = sig.add_plain_predicate("p", 1);

        assert_eq!(p, p2);
        assert_ne!(p, q);
        assert_eq!(sig.predicate_name(p), "p");
    }

    #[test]
    fn test_equality_is_builtin() {
        let sig = Signature::new();
        let eq = sig.equality();
        assert_eq!(sig.predicate_name(eq), "=");
        assert_eq!(sig.predicate_arity(eq), 2);
        assert!(sig.predicate_is_commutative(eq));
    }

    #[test]
    fn test_skolem_symbols_are_fresh_and_flagged() {
        let mut sig = Signature::new();
        let d = sig.default_sort();
        let sk0 = sig.add_skolem(&[], d);
        let sk1 = sig.add_skolem(&[d], d);
        assert_ne!(sk0, sk1);
        assert!(sig.is_skolem(sk0));
        assert!(sig.is_skolem(sk1));
        assert_eq!(sig.function_arity(sk1), 1);
    }

    #[test]
    fn test_numerals() {
        let mut sig = Signature::new();
        let two = sig.numeral(2);
        let two2 = sig.numeral(2);
        let neg = sig.numeral(-7);
        assert_eq!(two, two2);
        assert_eq!(sig.numeral_value(two), Some(2));
        assert_eq!(sig.numeral_value(neg), Some(-7));
        let f = sig.add_plain_function("f", 0);
        assert_eq!(sig.numeral_value(f), None);
    }

    #[test]
    fn test_arith_symbols() {
        let mut sig = Signature::new();
        let arith = sig.interpret_arithmetic();
        assert_eq!(sig.arith_function(arith.sum), Some(ArithFunction::Sum));
        assert!(sig.function_is_commutative(arith.sum));
        assert_eq!(
            sig.arith_predicate(arith.greater),
            Some(ArithPredicate::Greater)
        );
        // Idempotent
        let arith2 = sig.interpret_arithmetic();
        assert_eq!(arith.sum, arith2.sum);
    }

    #[test]
    fn test_sorts() {
        let mut sig = Signature::new();
        let nat = sig.add_sort("nat", BuiltinSort::Individual);
        assert!(!sig.sort_is_arithmetic(nat));
        assert!(sig.sort_is_arithmetic(sig.integer_sort()));
        assert_eq!(sig.sort_name(nat), "nat");
    }
}
