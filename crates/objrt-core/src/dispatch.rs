//! Dispatch table builder
//!
//! A class's dispatch table is rebuilt from three layers, each overriding the
//! previous: every entry of the superclass's table, the class's own methods,
//! then the methods of its categories in registration order. Rebuilding a
//! class also rebuilds its whole subtree so descendants see the change.

use crate::class::{ClassGraph, ClassInfo};
use crate::dtable::DispatchTable;
use std::sync::Arc;
use tracing::trace;

impl ClassGraph {
    /// Rebuild the dispatch table of a record and of every descendant
    ///
    /// Records without dispatch maintenance enabled are skipped together with
    /// their subtree.
    pub(crate) fn update_dtable(&mut self, index: usize) {
        let mut pending = vec![index];
        while let Some(current) = pending.pop() {
            if !self.records[current].class.info().contains(ClassInfo::DTABLE) {
                continue;
            }
            self.rebuild_dtable(current);
            // Reversed so subclasses are visited in list order
            pending.extend(self.records[current].subclasses.iter().rev().copied());
        }
    }

    fn rebuild_dtable(&mut self, index: usize) {
        let mut dtable = std::mem::replace(
            &mut self.records[index].dtable,
            self.empty_dtable.clone(),
        );
        if Arc::ptr_eq(&dtable, &self.empty_dtable) {
            dtable = Arc::new(DispatchTable::new());
        }
        let table = Arc::make_mut(&mut dtable);

        let record = &self.records[index];
        if let Some(superclass) = record.superclass {
            table.copy_from(&self.records[superclass].dtable);
        }

        for (_, method) in self.methods.iter_chain(&record.methods) {
            table.set(method.sel, method.imp.clone());
        }

        let side = self.side(index);
        for batch in self.categories.batches_for(record.class.name(), side) {
            for method in &self.methods.batch(batch).methods {
                table.set(method.sel, method.imp.clone());
            }
        }

        trace!(
            class = %record.class.name(),
            metaclass = record.is_metaclass(),
            entries = table.len(),
            "rebuilt dispatch table"
        );
        self.records[index].dtable = dtable;
    }
}
