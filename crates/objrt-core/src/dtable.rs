//! Dispatch tables for dynamic method resolution

use crate::imp::Imp;
use crate::selector::SelectorId;
use rustc_hash::FxHashMap;

/// Selector to implementation table
///
/// Only two mutators exist: [`copy_from`](Self::copy_from) inherits every entry
/// of another table and [`set`](Self::set) overlays a single entry. Nothing
/// ever removes entries.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    entries: FxHashMap<SelectorId, Imp>,
}

impl DispatchTable {
    /// Create a new empty dispatch table
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the implementation for a selector
    pub fn get(&self, sel: SelectorId) -> Option<&Imp> {
        self.entries.get(&sel)
    }

    /// Check whether a selector has an entry
    pub fn contains(&self, sel: SelectorId) -> bool {
        self.entries.contains_key(&sel)
    }

    /// Overlay one entry
    pub fn set(&mut self, sel: SelectorId, imp: Imp) {
        self.entries.insert(sel, imp);
    }

    /// Copy every entry of `other` into this table, overwriting same keys
    pub fn copy_from(&mut self, other: &DispatchTable) {
        self.entries.reserve(other.entries.len());
        for (sel, imp) in &other.entries {
            self.entries.insert(*sel, imp.clone());
        }
    }

    /// Get number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in selector order
    pub fn entries(&self) -> Vec<(SelectorId, Imp)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(sel, imp)| (*sel, imp.clone()))
            .collect();
        entries.sort_by_key(|(sel, _)| *sel);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(id: u32) -> SelectorId {
        SelectorId::from_u32(id)
    }

    #[test]
    fn test_set_and_get() {
        let mut table = DispatchTable::new();
        let imp = Imp::stub("foo");
        table.set(sel(1), imp.clone());

        assert_eq!(table.get(sel(1)), Some(&imp));
        assert!(table.get(sel(2)).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_copy_from_overwrites_without_clearing() {
        let mut parent = DispatchTable::new();
        let parent_foo = Imp::stub("Parent.foo");
        parent.set(sel(1), parent_foo.clone());
        parent.set(sel(2), Imp::stub("Parent.bar"));

        let mut child = DispatchTable::new();
        let child_bar = Imp::stub("Child.bar");
        let child_baz = Imp::stub("Child.baz");
        child.set(sel(2), child_bar);
        child.set(sel(3), child_baz.clone());

        child.copy_from(&parent);

        assert_eq!(child.get(sel(1)), Some(&parent_foo));
        assert_eq!(child.get(sel(2)).and_then(Imp::symbol), Some("Parent.bar"));
        assert_eq!(child.get(sel(3)), Some(&child_baz));
    }

    #[test]
    fn test_entries_sorted() {
        let mut table = DispatchTable::new();
        table.set(sel(7), Imp::stub("b"));
        table.set(sel(3), Imp::stub("a"));

        let ids: Vec<_> = table.entries().into_iter().map(|(s, _)| s.as_u32()).collect();
        assert_eq!(ids, vec![3, 7]);
    }
}
