//! Bulk registration and `load` hook dispatch
//!
//! Registering a symbol table happens in three passes:
//!
//! 1. every class is registered (with its selectors), then every category;
//! 2. every class declaring a `load` hook is linked and, if linking works,
//!    its hook runs after those of all its ancestors; classes whose chain
//!    cannot be resolved yet are queued. Classes without a hook are simply
//!    marked loaded;
//! 3. the queue is retried until no entry can make progress.
//!
//! The queue outlives a single registration, so a class deferred by one
//! symbol table is picked up once a later table supplies its ancestors.

use crate::class::{Class, ClassGraph, ClassInfo};
use crate::imp::Imp;
use crate::runtime::Runtime;
use crate::selector::SelectorId;
use crate::symtab::SymbolTable;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Classes whose `load` hook is waiting for an unresolved ancestor
#[derive(Debug, Default)]
pub(crate) struct LoadQueue {
    entries: Vec<usize>,
}

impl LoadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: usize) {
        self.entries.push(index);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Remove and return the first entry `ready` accepts
    ///
    /// The last entry takes the removed entry's place.
    pub fn take_first(&mut self, mut ready: impl FnMut(usize) -> bool) -> Option<usize> {
        let position = self.entries.iter().position(|index| ready(*index))?;
        Some(self.entries.swap_remove(position))
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().copied()
    }
}

/// Outcome of registering a symbol table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Classes registered
    pub classes: usize,
    /// Categories registered
    pub categories: usize,
    /// `load` hooks invoked, across ancestors and queued classes
    pub loads_run: usize,
    /// Classes still waiting for an ancestor, by name
    pub pending: Vec<String>,
}

type PendingLoads = Vec<(Class, Vec<Imp>)>;

impl ClassGraph {
    /// Mark every not-yet-loaded class on the chain to `index` as loaded and
    /// collect their hooks, root first
    fn take_pending_loads(&mut self, index: usize, sel: SelectorId) -> PendingLoads {
        let mut chain: Vec<usize> = self
            .ancestry(index)
            .filter(|ancestor| !self.records[*ancestor].class.info().contains(ClassInfo::LOADED))
            .collect();
        chain.reverse();

        chain
            .into_iter()
            .map(|ancestor| {
                let class = self.class(ancestor);
                class.insert_info(ClassInfo::LOADED);
                (class, self.collect_hooks(ancestor, sel))
            })
            .collect()
    }

    /// Take the first queued class that links now
    fn next_ready_load(&mut self) -> Option<usize> {
        let mut queue = std::mem::take(&mut self.load_queue);
        let ready = queue.take_first(|index| self.setup_class(index));
        self.load_queue = queue;
        ready
    }

    /// Dispatch-enabled records affected by newly registered categories
    fn category_targets(&self, class_names: &FxHashSet<Arc<str>>) -> Vec<usize> {
        class_names
            .iter()
            .filter_map(|name| self.table.get(name))
            .flat_map(|index| [index, self.records[index].pair])
            .filter(|index| self.records[*index].class.info().contains(ClassInfo::DTABLE))
            .collect()
    }
}

impl Runtime {
    /// Register a compiler-emitted symbol table and run `load` hooks
    ///
    /// Categories are applied to classes that already have dispatch tables.
    /// Hooks of classes whose superclass chain is incomplete run as soon as a
    /// later registration completes it. A class that can never be linked
    /// stays in the queue and is reported in [`LoadReport::pending`].
    pub fn register_symbol_table(&self, symtab: SymbolTable) -> LoadReport {
        let guard = self.lock();
        let sel = self.load_selector();
        let mut report = LoadReport {
            classes: symtab.classes.len(),
            categories: symtab.categories.len(),
            ..LoadReport::default()
        };

        let classes: Vec<Class> = {
            let mut graph = guard.borrow_mut();
            let selectors = self.selectors().clone();
            let classes: Vec<Class> = symtab
                .classes
                .into_iter()
                .map(|def| graph.register_class(def, selectors.as_ref()))
                .collect();

            let mut extended = FxHashSet::default();
            for def in symtab.categories {
                extended.insert(Arc::<str>::from(def.class_name.as_str()));
                graph.register_category(def, selectors.as_ref());
            }
            for index in graph.category_targets(&extended) {
                graph.update_dtable(index);
            }
            classes
        };

        for class in &classes {
            let pending = {
                let mut graph = guard.borrow_mut();
                let Some(index) = graph.resolve(class) else {
                    continue;
                };
                if !graph.has_hook(index, sel) {
                    class.insert_info(ClassInfo::LOADED);
                    continue;
                }
                if !graph.setup_class(index) {
                    debug!(class = %class.name(), "deferring load until superclass is registered");
                    graph.load_queue.push(index);
                    continue;
                }
                graph.take_pending_loads(index, sel)
            };
            report.loads_run += self.run_loads(pending, sel);
        }

        // Restart the scan after every success: a hook may register classes
        // that unblock entries already passed over.
        loop {
            let pending = {
                let mut graph = guard.borrow_mut();
                let Some(index) = graph.next_ready_load() else {
                    break;
                };
                debug!(class = %graph.record(index).class.name(), "dequeued deferred load");
                graph.take_pending_loads(index, sel)
            };
            report.loads_run += self.run_loads(pending, sel);
        }

        let queued = {
            let graph = guard.borrow();
            report.pending = graph
                .load_queue
                .iter()
                .map(|index| graph.record(index).class.name().to_string())
                .collect();
            graph.load_queue.len()
        };
        if !report.pending.is_empty() {
            warn!(
                classes = ?report.pending,
                "load hooks still waiting for unresolved superclasses"
            );
        }
        debug!(
            classes = report.classes,
            categories = report.categories,
            loads = report.loads_run,
            queued,
            "registered symbol table"
        );
        drop(guard);
        report
    }

    fn run_loads(&self, pending: PendingLoads, sel: SelectorId) -> usize {
        let mut ran = 0;
        for (class, hooks) in pending {
            for hook in hooks {
                trace!(class = %class.name(), hook = ?hook, "running load hook");
                hook.call(self, &class, sel);
                ran += 1;
            }
        }
        ran
    }
}
