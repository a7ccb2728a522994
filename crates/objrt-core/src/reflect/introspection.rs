//! Class introspection queries

use crate::class::{Class, Ivar, MethodRef};
use crate::dtable::DispatchTable;
use crate::imp::Imp;
use crate::runtime::Runtime;
use crate::selector::SelectorId;
use crate::{RuntimeError, RuntimeResult};

/// Byte offset of an ivar within its object
pub fn ivar_offset(ivar: &Ivar) -> i64 {
    ivar.offset()
}

impl Runtime {
    /// Class bound to `name`, without linking it
    pub fn class_named(&self, name: &str) -> Option<Class> {
        self.with_graph(|graph| graph.named(name).map(|index| graph.class(index)))
    }

    /// Class bound to `name`, linked on demand
    ///
    /// Absent if no class is bound to the name or its superclass chain cannot
    /// be resolved yet.
    pub fn lookup_class(&self, name: &str) -> Option<Class> {
        let class = self.class_named(name)?;
        if class.is_linked() {
            return Some(class);
        }
        let linked = self.with_graph(|graph| {
            graph
                .resolve(&class)
                .is_some_and(|index| graph.setup_class(index))
        });
        linked.then_some(class)
    }

    /// Like [`lookup_class`](Self::lookup_class), reporting a missing class
    pub fn require_class(&self, name: &str) -> RuntimeResult<Class> {
        self.lookup_class(name)
            .ok_or_else(|| RuntimeError::ClassNotFound(name.to_string()))
    }

    /// Resolved superclass
    ///
    /// The root metaclass reports the root class.
    pub fn superclass(&self, class: &Class) -> Option<Class> {
        self.initialize_class(class);
        self.with_graph(|graph| {
            let index = graph.resolve(class)?;
            graph.record(index).superclass.map(|sup| graph.class(sup))
        })
    }

    /// Metaclass of a class; absent for a metaclass
    pub fn metaclass_of(&self, class: &Class) -> Option<Class> {
        if class.is_metaclass() {
            return None;
        }
        self.with_graph(|graph| {
            let index = graph.resolve(class)?;
            Some(graph.class(graph.record(index).pair))
        })
    }

    /// Whether `other` appears on the superclass chain of `class` (itself included)
    pub fn is_subclass_of(&self, class: &Class, other: &Class) -> bool {
        self.initialize_class(class);
        self.initialize_class(other);
        self.with_graph(|graph| {
            let (Some(index), Some(other)) = (graph.resolve(class), graph.resolve(other)) else {
                return false;
            };
            graph.ancestry(index).any(|ancestor| ancestor == other)
        })
    }

    /// Finalized instance size; absent while the class cannot be linked
    pub fn instance_size(&self, class: &Class) -> Option<usize> {
        self.initialize_class(class);
        class.is_linked().then(|| class.finalized_size())
    }

    /// Ivar declared by the class itself
    pub fn ivar(&self, class: &Class, name: &str) -> Option<Ivar> {
        self.initialize_class(class);
        self.with_graph(|graph| {
            let index = graph.resolve(class)?;
            graph
                .record(index)
                .ivars
                .iter()
                .find(|ivar| ivar.name() == name)
                .cloned()
        })
    }

    /// Every ivar declared by the class itself, in declaration order
    pub fn ivar_list(&self, class: &Class) -> Vec<Ivar> {
        self.initialize_class(class);
        self.with_graph(|graph| {
            graph
                .resolve(class)
                .map(|index| graph.record(index).ivars.clone())
                .unwrap_or_default()
        })
    }

    /// Method entry for a selector, searching the class and then its ancestors
    ///
    /// Only methods declared on the classes themselves are found, not those
    /// added by categories.
    pub fn method(&self, class: &Class, sel: SelectorId) -> Option<MethodRef> {
        self.initialize_class(class);
        self.with_graph(|graph| {
            let index = graph.resolve(class)?;
            graph
                .ancestry(index)
                .find_map(|ancestor| graph.methods.find_in_chain(&graph.record(ancestor).methods, sel))
        })
    }

    /// Implementation the dispatch table holds for a selector
    pub fn lookup_implementation(&self, class: &Class, sel: SelectorId) -> Option<Imp> {
        self.initialize_class(class);
        self.with_graph(|graph| {
            let index = graph.resolve(class)?;
            graph.record(index).dtable.get(sel).cloned()
        })
    }

    /// Whether the dispatch table has an entry for a selector
    pub fn responds_to(&self, class: &Class, sel: SelectorId) -> bool {
        self.lookup_implementation(class, sel).is_some()
    }

    /// Whether the nearest class declaring `sel` among its own methods is
    /// named `class_name`
    pub fn method_is_from_class(&self, class: &Class, sel: SelectorId, class_name: &str) -> bool {
        self.initialize_class(class);
        self.with_graph(|graph| {
            let Some(index) = graph.resolve(class) else {
                return false;
            };
            graph
                .ancestry(index)
                .find(|ancestor| {
                    graph
                        .methods
                        .find_in_chain(&graph.record(*ancestor).methods, sel)
                        .is_some()
                })
                .is_some_and(|owner| graph.record(owner).class.name() == class_name)
        })
    }

    /// Type encoding declared for a selector by the class or its categories
    ///
    /// A metaclass handle searches class methods.
    pub fn type_encoding(&self, class: &Class, sel: SelectorId) -> Option<String> {
        self.initialize_class(class);
        self.with_graph(|graph| {
            let index = graph.resolve(class)?;
            let record = graph.record(index);
            let own = graph.methods.find_in_chain(&record.methods, sel);
            let found = own.or_else(|| {
                graph
                    .categories
                    .batches_for(record.class.name(), graph.side(index))
                    .find_map(|batch| graph.methods.find_in_chain(&[batch], sel))
            })?;
            graph.methods.get(found).map(|method| method.types.to_string())
        })
    }

    /// Copy of the class's current dispatch table
    pub fn dispatch_table(&self, class: &Class) -> Option<DispatchTable> {
        self.initialize_class(class);
        self.with_graph(|graph| {
            let index = graph.resolve(class)?;
            Some(DispatchTable::clone(&graph.record(index).dtable))
        })
    }

    /// Registered classes whose superclass chain cannot be resolved
    ///
    /// Every other bound class is linked as a side effect.
    pub fn unresolved_classes(&self) -> Vec<String> {
        self.with_graph(|graph| {
            let mut bound: Vec<usize> = graph.table.iter().map(|(_, index)| index).collect();
            bound.sort_unstable();
            bound.dedup();
            let mut unresolved = Vec::new();
            for index in bound {
                if !graph.setup_class(index) {
                    unresolved.push(graph.record(index).class.name().to_string());
                }
            }
            unresolved
        })
    }
}
