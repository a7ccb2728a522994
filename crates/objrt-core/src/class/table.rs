//! Class table: name to record mapping

use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Class table
///
/// Starts uninitialized; the first insertion creates the map. Teardown drops
/// the map so the table reads as uninitialized again.
#[derive(Debug, Default)]
pub(crate) struct ClassTable {
    names: Option<FxHashMap<Arc<str>, usize>>,
    /// Binding order, for stable listings
    order: Vec<Arc<str>>,
}

impl ClassTable {
    /// Create an uninitialized table
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.names.is_some()
    }

    /// Bind `name` to a record index; the last registration under a name wins
    pub fn insert(&mut self, name: Arc<str>, index: usize) -> Option<usize> {
        let names = self.names.get_or_insert_with(FxHashMap::default);
        let previous = names.insert(name.clone(), index);
        if previous.is_none() {
            self.order.push(name);
        }
        previous
    }

    /// Bind an additional name to an existing record
    ///
    /// Returns false if the table has never been initialized.
    pub fn alias(&mut self, name: Arc<str>, index: usize) -> bool {
        if self.names.is_none() {
            return false;
        }
        self.insert(name, index);
        true
    }

    /// Look up a record index by name
    pub fn get(&self, name: &str) -> Option<usize> {
        self.names.as_ref()?.get(name).copied()
    }

    /// Number of name bindings
    pub fn len(&self) -> usize {
        self.names.as_ref().map_or(0, |names| names.len())
    }

    /// Iterate over bindings in first-binding order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.order.iter().filter_map(move |name| {
            let index = self.get(name)?;
            Some((&**name, index))
        })
    }
}
