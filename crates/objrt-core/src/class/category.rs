//! Category storage, keyed by the name of the class a category extends

use super::{BatchId, Side};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug)]
pub(crate) struct Category {
    pub name: Arc<str>,
    pub class_name: Arc<str>,
    pub instance_methods: Option<BatchId>,
    pub class_methods: Option<BatchId>,
}

impl Category {
    /// Batch applied to the given side of the class
    pub fn batch(&self, side: Side) -> Option<BatchId> {
        match side {
            Side::Instance => self.instance_methods,
            Side::Class => self.class_methods,
        }
    }
}

/// Categories in registration order, indexed by class name
#[derive(Debug, Default)]
pub(crate) struct CategoryStore {
    categories: Vec<Category>,
    by_class: FxHashMap<Arc<str>, Vec<usize>>,
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category) -> usize {
        let index = self.categories.len();
        trace!(
            category = %category.name,
            class = %category.class_name,
            index,
            "registered category"
        );
        self.by_class
            .entry(category.class_name.clone())
            .or_default()
            .push(index);
        self.categories.push(category);
        index
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn get(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    /// Category indices for a class, oldest first
    pub fn for_class(&self, class_name: &str) -> &[usize] {
        self.by_class
            .get(class_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Batches for one side of a class, oldest category first
    pub fn batches_for<'a>(
        &'a self,
        class_name: &str,
        side: Side,
    ) -> impl Iterator<Item = BatchId> + 'a {
        self.for_class(class_name)
            .iter()
            .filter_map(move |index| self.categories[*index].batch(side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{BatchOwner, MethodArena};

    #[test]
    fn test_for_class_keeps_registration_order() {
        let mut arena = MethodArena::new();
        let mut store = CategoryStore::new();
        let first = arena.alloc(BatchOwner::Class(0), Vec::new());
        let second = arena.alloc(BatchOwner::Class(0), Vec::new());

        store.insert(Category {
            name: Arc::from("A"),
            class_name: Arc::from("Widget"),
            instance_methods: Some(first),
            class_methods: None,
        });
        store.insert(Category {
            name: Arc::from("Other"),
            class_name: Arc::from("Gadget"),
            instance_methods: None,
            class_methods: None,
        });
        store.insert(Category {
            name: Arc::from("B"),
            class_name: Arc::from("Widget"),
            instance_methods: Some(second),
            class_methods: None,
        });

        assert_eq!(store.for_class("Widget"), &[0, 2]);
        let batches: Vec<_> = store.batches_for("Widget", Side::Instance).collect();
        assert_eq!(batches, vec![first, second]);
        assert_eq!(store.batches_for("Widget", Side::Class).count(), 0);
        assert!(store.for_class("Missing").is_empty());
        assert_eq!(store.get(1).map(|c| &*c.name), Some("Other"));
    }
}
