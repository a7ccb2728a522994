//! Method entries, method batches and the batch arena
//!
//! A class's methods form a chain of batches, newest first. Batches are
//! never removed, so a [`MethodRef`] stays valid for the lifetime of the
//! runtime that handed it out; entries are replaced in place.

use crate::imp::Imp;
use crate::selector::SelectorId;
use std::sync::Arc;

/// One method entry
#[derive(Debug, Clone)]
pub(crate) struct Method {
    pub sel: SelectorId,
    pub types: Arc<str>,
    pub imp: Imp,
}

/// Which method set of a category a batch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    /// Instance methods, applied to the class record
    Instance,
    /// Class methods, applied to the metaclass record
    Class,
}

/// Record owning a batch, used to find the dispatch table to rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BatchOwner {
    Class(usize),
    Category { index: usize, side: Side },
}

#[derive(Debug)]
pub(crate) struct MethodBatch {
    pub owner: BatchOwner,
    pub methods: Vec<Method>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct BatchId(u32);

/// Reference to one method entry
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    batch: u32,
    slot: u32,
}

/// Arena of every method batch the runtime owns
#[derive(Debug, Default)]
pub(crate) struct MethodArena {
    batches: Vec<MethodBatch>,
}

impl MethodArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a batch and return its id
    pub fn alloc(&mut self, owner: BatchOwner, methods: Vec<Method>) -> BatchId {
        self.batches.push(MethodBatch { owner, methods });
        BatchId((self.batches.len() - 1) as u32)
    }

    pub fn batch(&self, id: BatchId) -> &MethodBatch {
        &self.batches[id.0 as usize]
    }

    pub fn owner(&self, method: MethodRef) -> Option<BatchOwner> {
        self.batches
            .get(method.batch as usize)
            .map(|batch| batch.owner)
    }

    pub fn get(&self, method: MethodRef) -> Option<&Method> {
        self.batches
            .get(method.batch as usize)?
            .methods
            .get(method.slot as usize)
    }

    pub fn get_mut(&mut self, method: MethodRef) -> Option<&mut Method> {
        self.batches
            .get_mut(method.batch as usize)?
            .methods
            .get_mut(method.slot as usize)
    }

    /// Walk a chain of batches in chain order
    pub fn iter_chain<'a>(
        &'a self,
        chain: &'a [BatchId],
    ) -> impl Iterator<Item = (MethodRef, &'a Method)> + 'a {
        chain.iter().flat_map(move |id| {
            self.batch(*id)
                .methods
                .iter()
                .enumerate()
                .map(move |(slot, method)| {
                    (
                        MethodRef {
                            batch: id.0,
                            slot: slot as u32,
                        },
                        method,
                    )
                })
        })
    }

    /// First entry for `sel` in a chain
    pub fn find_in_chain(&self, chain: &[BatchId], sel: SelectorId) -> Option<MethodRef> {
        self.iter_chain(chain)
            .find(|(_, method)| method.sel == sel)
            .map(|(method_ref, _)| method_ref)
    }
}

/// Caller-owned list of method references
///
/// Returned by [`Runtime::copy_method_list`](crate::Runtime::copy_method_list).
/// Ownership of the list passes to the caller and dropping it releases the
/// storage. The references inside remain valid for as long as the runtime
/// they came from, independently of the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodList {
    methods: Vec<MethodRef>,
}

impl MethodList {
    pub(crate) fn new(methods: Vec<MethodRef>) -> Self {
        Self { methods }
    }

    /// Number of methods in the list
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Take the references out of the list
    pub fn into_vec(self) -> Vec<MethodRef> {
        self.methods
    }
}

impl std::ops::Deref for MethodList {
    type Target = [MethodRef];

    fn deref(&self) -> &[MethodRef] {
        &self.methods
    }
}

impl IntoIterator for MethodList {
    type Item = MethodRef;
    type IntoIter = std::vec::IntoIter<MethodRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.methods.into_iter()
    }
}

impl<'a> IntoIterator for &'a MethodList {
    type Item = &'a MethodRef;
    type IntoIter = std::slice::Iter<'a, MethodRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.methods.iter()
    }
}
