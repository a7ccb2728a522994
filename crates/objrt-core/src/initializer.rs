//! One-time class initialization
//!
//! A class moves through unlinked, linked, dispatch-enabled and initialized
//! states. Initialization links the class, enables and builds the dispatch
//! tables of every uninitialized ancestor and of the class itself, and runs
//! their `initialize` hooks root first. The initialized flag is set before a
//! hook runs so that a request made from inside the hook returns at once.

use crate::class::{Class, ClassGraph, ClassInfo};
use crate::imp::Imp;
use crate::runtime::Runtime;
use crate::selector::SelectorId;
use tracing::trace;

impl ClassGraph {
    /// Uninitialized classes on the chain from the root down to `index`
    fn uninitialized_chain(&self, index: usize) -> Vec<usize> {
        let mut chain: Vec<usize> = self
            .ancestry(index)
            .take_while(|ancestor| !self.records[*ancestor].class.is_initialized())
            .collect();
        chain.reverse();
        chain
    }

    /// Enable and build both dispatch tables and mark the pair initialized
    ///
    /// Returns the `initialize` hooks to run, or `None` if another request got
    /// there first.
    fn prepare_initialize(&mut self, index: usize, sel: SelectorId) -> Option<Vec<Imp>> {
        let class = self.records[index].class.clone();
        if class.is_initialized() {
            return None;
        }
        let meta_index = self.records[index].pair;
        let meta = self.records[meta_index].class.clone();

        class.insert_info(ClassInfo::DTABLE);
        meta.insert_info(ClassInfo::DTABLE);
        self.update_dtable(index);
        self.update_dtable(meta_index);

        class.insert_info(ClassInfo::INITIALIZED);
        meta.insert_info(ClassInfo::INITIALIZED);
        Some(self.collect_hooks(index, sel))
    }
}

impl Runtime {
    /// Make sure a class is linked, has its dispatch tables and has run its
    /// `initialize` hook, along with every ancestor
    ///
    /// A metaclass handle initializes its class. Returns whether the class is
    /// initialized afterwards; it is not if its superclass chain cannot be
    /// resolved yet. Concurrent requests run each hook once, ancestors first.
    pub fn initialize_class(&self, class: &Class) -> bool {
        if class.is_initialized() {
            return true;
        }

        let guard = self.lock();
        if class.is_initialized() {
            return true;
        }

        let chain = {
            let mut graph = guard.borrow_mut();
            let Some(index) = graph.resolve(class) else {
                return false;
            };
            let index = graph.instance_side(index);
            if !graph.setup_class(index) {
                return false;
            }
            graph.uninitialized_chain(index)
        };

        let sel = self.initialize_selector();
        for index in chain {
            let prepared = {
                let mut graph = guard.borrow_mut();
                graph
                    .prepare_initialize(index, sel)
                    .map(|hooks| (graph.class(index), hooks))
            };
            let Some((target, hooks)) = prepared else {
                continue;
            };

            trace!(class = %target.name(), hooks = hooks.len(), "initialized class");
            for hook in hooks {
                trace!(class = %target.name(), hook = ?hook, "running initialize hook");
                hook.call(self, &target, sel);
            }
        }

        drop(guard);
        class.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use crate::{ClassDef, Imp, Runtime};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recording_hook(log: &Arc<Mutex<Vec<String>>>) -> Imp {
        let log = log.clone();
        Imp::new(move |_, class, _| log.lock().push(class.name().to_string()))
    }

    #[test]
    fn test_initialize_runs_ancestors_first() {
        let rt = Runtime::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        rt.register_class(
            ClassDef::new("Root", 8).with_class_method("initialize", "v16@0:8", recording_hook(&log)),
        );
        rt.register_class(ClassDef::new("Mid", 4).with_superclass("Root"));
        let leaf = rt.register_class(
            ClassDef::new("Leaf", 4)
                .with_superclass("Mid")
                .with_class_method("initialize", "v16@0:8", recording_hook(&log)),
        );

        assert!(rt.initialize_class(&leaf));
        assert!(rt.initialize_class(&leaf));

        assert_eq!(*log.lock(), vec!["Root", "Leaf"]);
        assert!(leaf.is_initialized());
        assert!(rt.metaclass_of(&leaf).unwrap().is_initialized());
    }

    #[test]
    fn test_unlinkable_class_stays_uninitialized() {
        let rt = Runtime::default();
        let orphan = rt.register_class(ClassDef::new("Orphan", 4).with_superclass("Missing"));

        assert!(!rt.initialize_class(&orphan));
        assert!(!orphan.is_linked());
        assert!(!orphan.is_initialized());
    }

    #[test]
    fn test_reentrant_request_from_hook_returns() {
        let rt = Runtime::default();
        let observed = Arc::new(Mutex::new(None));
        let seen = observed.clone();
        let class = rt.register_class(ClassDef::new("Widget", 0).with_class_method(
            "initialize",
            "v16@0:8",
            Imp::new(move |rt, class, _| {
                *seen.lock() = Some(rt.initialize_class(class));
            }),
        ));

        assert!(rt.initialize_class(&class));
        assert_eq!(*observed.lock(), Some(true));
    }

    #[test]
    fn test_metaclass_handle_initializes_class() {
        let rt = Runtime::default();
        let class = rt.register_class(ClassDef::new("Widget", 0));
        let meta = rt.metaclass_of(&class).unwrap();

        assert!(rt.initialize_class(&meta));
        assert!(class.is_initialized());
    }

    #[test]
    fn test_instance_side_initialize_method_is_not_a_hook() {
        let rt = Runtime::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        let class = rt.register_class(
            ClassDef::new("Widget", 0).with_method("initialize", "v16@0:8", recording_hook(&log)),
        );

        assert!(rt.initialize_class(&class));
        assert!(log.lock().is_empty());
    }
}
