//! The runtime service object
//!
//! A [`Runtime`] owns the class graph behind one global lock. The lock is
//! reentrant: `load` and `initialize` hooks run with it held and may call
//! back into the runtime from the same thread, while other threads block.
//! The graph itself sits in a `RefCell` whose borrows are always scoped to a
//! single operation, and never held across a hook call.

use crate::class::{Class, ClassGraph, ClassList};
use crate::dtable::DispatchTable;
use crate::options::RuntimeOptions;
use crate::selector::{SelectorId, SelectorRegistry, SelectorTable};
use crate::symtab::{CategoryDef, ClassDef};
use crate::{RuntimeError, RuntimeResult};
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::cell::RefCell;
use std::sync::Arc;
use tracing::debug;

/// Class/method-dispatch runtime
pub struct Runtime {
    graph: ReentrantMutex<RefCell<ClassGraph>>,
    selectors: Arc<dyn SelectorRegistry>,
    options: RuntimeOptions,
    empty_dtable: Arc<DispatchTable>,
    load_sel: SelectorId,
    initialize_sel: SelectorId,
}

impl Runtime {
    /// Create a runtime with its own selector table
    pub fn new(options: RuntimeOptions) -> Self {
        Self::with_selectors(options, Arc::new(SelectorTable::new()))
    }

    /// Create a runtime sharing an existing selector registry
    pub fn with_selectors(options: RuntimeOptions, selectors: Arc<dyn SelectorRegistry>) -> Self {
        let empty_dtable = Arc::new(DispatchTable::new());
        let load_sel = selectors.register(&options.load_selector);
        let initialize_sel = selectors.register(&options.initialize_selector);
        let graph = ClassGraph::new(empty_dtable.clone(), options.warn_legacy_ivar_offsets);

        Self {
            graph: ReentrantMutex::new(RefCell::new(graph)),
            selectors,
            options,
            empty_dtable,
            load_sel,
            initialize_sel,
        }
    }

    /// Options the runtime was created with
    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    /// Selector registry used for every method the runtime sees
    pub fn selectors(&self) -> &Arc<dyn SelectorRegistry> {
        &self.selectors
    }

    /// Register (or look up) a selector by name
    pub fn register_selector(&self, name: &str) -> SelectorId {
        self.selectors.register(name)
    }

    /// Name a selector was registered under
    pub fn selector_name(&self, sel: SelectorId) -> Option<Arc<str>> {
        self.selectors.name(sel)
    }

    pub(crate) fn load_selector(&self) -> SelectorId {
        self.load_sel
    }

    pub(crate) fn initialize_selector(&self) -> SelectorId {
        self.initialize_sel
    }

    pub(crate) fn lock(&self) -> ReentrantMutexGuard<'_, RefCell<ClassGraph>> {
        self.graph.lock()
    }

    /// Run `f` against the graph under the global lock
    ///
    /// `f` must not call back into the runtime.
    pub(crate) fn with_graph<R>(&self, f: impl FnOnce(&mut ClassGraph) -> R) -> R {
        let guard = self.lock();
        let mut graph = guard.borrow_mut();
        f(&mut graph)
    }

    /// Register a single class definition
    ///
    /// Binds the name (replacing any earlier binding), creates the metaclass
    /// pair and registers every selector the class declares. The class is not
    /// linked and its `load` hook is not run; use
    /// [`register_symbol_table`](Self::register_symbol_table) for that.
    pub fn register_class(&self, def: ClassDef) -> Class {
        let selectors = self.selectors.clone();
        self.with_graph(|graph| graph.register_class(def, selectors.as_ref()))
    }

    /// Register a category
    ///
    /// Dispatch tables are not rebuilt; call
    /// [`update_dispatch_table`](Self::update_dispatch_table) on the extended
    /// class (or any ancestor) to make the category's methods visible.
    pub fn register_category(&self, def: CategoryDef) {
        let selectors = self.selectors.clone();
        self.with_graph(|graph| {
            graph.register_category(def, selectors.as_ref());
        })
    }

    /// Bind an additional name to an already registered class
    pub fn register_alias(&self, class: &Class, alias: &str) -> RuntimeResult<()> {
        self.with_graph(|graph| {
            if !graph.table.is_initialized() {
                return Err(RuntimeError::TableNotInitialized);
            }
            let index = graph
                .resolve(class)
                .ok_or_else(|| RuntimeError::ClassNotFound(class.name().to_string()))?;
            let index = graph.instance_side(index);
            graph.table.alias(Arc::from(alias), index);
            Ok(())
        })
    }

    /// Rebuild the dispatch tables of a class and all its descendants
    ///
    /// Has no effect on classes that have not been initialized yet; their
    /// tables are built on first use.
    pub fn update_dispatch_table(&self, class: &Class) {
        self.with_graph(|graph| {
            if let Some(index) = graph.resolve(class) {
                graph.update_dtable(index);
            }
        })
    }

    /// Snapshot of the class table
    ///
    /// `total` counts every name binding; at most `max` handles are returned.
    pub fn class_list(&self, max: usize) -> ClassList {
        self.with_graph(|graph| ClassList {
            total: graph.table.len(),
            classes: graph
                .table
                .iter()
                .take(max)
                .map(|(_, index)| graph.class(index))
                .collect(),
        })
    }

    /// Release every class record, dispatch table and subclass list
    ///
    /// The class table returns to its uninitialized state. Handles obtained
    /// before teardown no longer resolve to any record.
    pub fn teardown(&self) {
        let guard = self.lock();
        let fresh = ClassGraph::new(
            self.empty_dtable.clone(),
            self.options.warn_legacy_ivar_offsets,
        );
        let released = guard.replace(fresh);
        debug!(
            records = released.records.len(),
            categories = released.categories.len(),
            "runtime torn down"
        );
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(RuntimeOptions::default())
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("options", &self.options)
            .field("selectors", &self.selectors.len())
            .finish_non_exhaustive()
    }
}
