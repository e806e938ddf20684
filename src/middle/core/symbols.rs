//! Symbol table
//!
//! Chained hash table keyed by name and kind. Buckets are chosen by a djb2
//! hash of the name modulo the capacity; the table grows to `2n + 1` buckets
//! before an insert would push the load factor past 0.8.

use crate::middle::core::ir::SizeClass;
use std::fmt;

const INITIAL_CAPACITY: usize = 7;
const MAX_LOAD: f64 = 0.8;

/// Identifier kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    System,
}

/// Symbol table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub kind: SymbolKind,
    /// Declared size class; `None` until a declaration is seen
    pub size: Option<SizeClass>,
    /// Reads of the variable
    pub use_amount: usize,
    /// Writes to the variable
    pub set_amount: usize,
    /// Constant stored by the first write, if it was a constant.
    /// Only meaningful while `set_amount == 1`.
    pub first_value: Option<u64>,
}

impl Identifier {
    fn new(
        kind: SymbolKind,
        name: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            size: None,
            use_amount: 0,
            set_amount: 0,
            first_value: None,
        }
    }

    fn matches(
        &self,
        kind: Option<SymbolKind>,
        name: &str,
    ) -> bool {
        self.name == name && kind.is_none_or(|k| k == self.kind)
    }
}

/// Symbol table failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    #[error("symbol `{0}` is not in the table")]
    NotFound(String),
}

/// djb2: `h = h * 33 + byte`, seeded with 5381
pub fn djb2(name: &str) -> u64 {
    name.bytes()
        .fold(5381u64, |h, b| h.wrapping_mul(33).wrapping_add(u64::from(b)))
}

/// Chained hash table of identifiers
#[derive(Clone)]
pub struct SymbolTable {
    buckets: Vec<Vec<Identifier>>,
    len: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); capacity.max(1)],
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    fn bucket_of(
        &self,
        name: &str,
    ) -> usize {
        (djb2(name) % self.buckets.len() as u64) as usize
    }

    /// Return the entry for `name`/`kind`, inserting a fresh one if absent
    pub fn add(
        &mut self,
        kind: SymbolKind,
        name: &str,
    ) -> &mut Identifier {
        let bucket = self.bucket_of(name);
        if let Some(pos) = self.buckets[bucket]
            .iter()
            .position(|id| id.matches(Some(kind), name))
        {
            return &mut self.buckets[bucket][pos];
        }

        if (self.len + 1) as f64 / self.buckets.len() as f64 > MAX_LOAD {
            self.grow();
        }
        let bucket = self.bucket_of(name);
        let chain = &mut self.buckets[bucket];
        chain.push(Identifier::new(kind, name));
        self.len += 1;
        let last = chain.len() - 1;
        &mut chain[last]
    }

    /// Look up by name, optionally restricted to a kind
    pub fn get(
        &self,
        kind: Option<SymbolKind>,
        name: &str,
    ) -> Option<&Identifier> {
        self.buckets[self.bucket_of(name)]
            .iter()
            .find(|id| id.matches(kind, name))
    }

    pub fn get_mut(
        &mut self,
        kind: Option<SymbolKind>,
        name: &str,
    ) -> Option<&mut Identifier> {
        let bucket = self.bucket_of(name);
        self.buckets[bucket]
            .iter_mut()
            .find(|id| id.matches(kind, name))
    }

    /// Delete an entry; removing an absent name is an error
    pub fn remove(
        &mut self,
        kind: SymbolKind,
        name: &str,
    ) -> Result<Identifier, SymbolError> {
        let bucket = self.bucket_of(name);
        let chain = &mut self.buckets[bucket];
        let pos = chain
            .iter()
            .position(|id| id.matches(Some(kind), name))
            .ok_or_else(|| SymbolError::NotFound(name.to_string()))?;
        self.len -= 1;
        Ok(chain.swap_remove(pos))
    }

    /// Entries in bucket order
    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        self.buckets.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Identifier> {
        self.buckets.iter_mut().flatten()
    }

    fn grow(&mut self) {
        let capacity = self.buckets.len() * 2 + 1;
        tracing::debug!("Symbol table grows {} -> {} buckets", self.buckets.len(), capacity);
        let old = std::mem::replace(&mut self.buckets, vec![Vec::new(); capacity]);
        for id in old.into_iter().flatten() {
            let bucket = self.bucket_of(&id.name);
            self.buckets[bucket].push(id);
        }
    }
}
