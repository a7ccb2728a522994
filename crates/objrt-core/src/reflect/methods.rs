//! Method queries and method replacement

use crate::class::{BatchOwner, Class, ClassGraph, Method, MethodList, MethodRef};
use crate::encoding::TypeEncoding;
use crate::imp::Imp;
use crate::runtime::Runtime;
use crate::selector::SelectorId;
use crate::{RuntimeError, RuntimeResult};
use std::sync::Arc;
use tracing::trace;

impl ClassGraph {
    /// Existing entry for `sel` that replacement should overwrite: the
    /// record's own methods first, then its categories for the record's side
    fn replaceable(&self, index: usize, sel: SelectorId) -> Option<MethodRef> {
        let record = self.record(index);
        self.methods.find_in_chain(&record.methods, sel).or_else(|| {
            self.categories
                .batches_for(record.class.name(), self.side(index))
                .find_map(|batch| self.methods.find_in_chain(&[batch], sel))
        })
    }
}

impl Runtime {
    /// Every method the class declares itself, newest batch first
    ///
    /// The list is a fresh allocation owned by the caller and released when
    /// dropped. Category methods and inherited methods are not included.
    pub fn copy_method_list(&self, class: &Class) -> MethodList {
        self.initialize_class(class);
        self.with_graph(|graph| {
            let Some(index) = graph.resolve(class) else {
                return MethodList::default();
            };
            MethodList::new(
                graph
                    .methods
                    .iter_chain(&graph.record(index).methods)
                    .map(|(method, _)| method)
                    .collect(),
            )
        })
    }

    /// Selector of a method
    pub fn method_name(&self, method: MethodRef) -> Option<SelectorId> {
        self.with_graph(|graph| graph.methods.get(method).map(|m| m.sel))
    }

    /// Current implementation of a method
    pub fn method_implementation(&self, method: MethodRef) -> Option<Imp> {
        self.with_graph(|graph| graph.methods.get(method).map(|m| m.imp.clone()))
    }

    /// Type encoding of a method
    pub fn method_type_encoding(&self, method: MethodRef) -> Option<String> {
        self.with_graph(|graph| graph.methods.get(method).map(|m| m.types.to_string()))
    }

    /// Return type decoded from a method's type encoding
    pub fn method_return_type(&self, method: MethodRef) -> RuntimeResult<String> {
        let types = self
            .method_type_encoding(method)
            .ok_or(RuntimeError::MethodNotFound)?;
        Ok(TypeEncoding::new(&types).return_type()?.to_string())
    }

    /// Argument count decoded from a method's type encoding
    ///
    /// The receiver and selector are counted.
    pub fn method_argument_count(&self, method: MethodRef) -> RuntimeResult<usize> {
        let types = self
            .method_type_encoding(method)
            .ok_or(RuntimeError::MethodNotFound)?;
        Ok(TypeEncoding::new(&types).argument_count()?)
    }

    /// Install `imp` for `sel` on a class (or metaclass) and rebuild its
    /// dispatch tables
    ///
    /// An existing entry among the class's own methods, then among its
    /// categories, is overwritten in place and its previous implementation
    /// returned. Otherwise a new single-method batch is prepended to the
    /// class's own methods and `None` is returned.
    pub fn replace_method(
        &self,
        class: &Class,
        sel: SelectorId,
        imp: Imp,
        types: &str,
    ) -> Option<Imp> {
        self.with_graph(|graph| {
            let index = graph.resolve(class)?;

            let previous = match graph.replaceable(index, sel) {
                Some(existing) => graph
                    .methods
                    .get_mut(existing)
                    .map(|method| std::mem::replace(&mut method.imp, imp)),
                None => {
                    let batch = graph.methods.alloc(
                        BatchOwner::Class(index),
                        vec![Method {
                            sel,
                            types: Arc::from(types),
                            imp,
                        }],
                    );
                    graph.records[index].methods.insert(0, batch);
                    None
                }
            };

            trace!(
                class = %class.name(),
                sel = sel.as_u32(),
                replaced = previous.is_some(),
                "replaced method"
            );
            graph.update_dtable(index);
            previous
        })
    }

    /// Swap the implementations of two methods and rebuild the dispatch
    /// tables of the classes they belong to
    pub fn exchange_implementations(&self, a: MethodRef, b: MethodRef) -> RuntimeResult<()> {
        self.with_graph(|graph| {
            let imp_a = graph.methods.get(a).ok_or(RuntimeError::MethodNotFound)?.imp.clone();
            let imp_b = graph.methods.get(b).ok_or(RuntimeError::MethodNotFound)?.imp.clone();
            if let Some(method) = graph.methods.get_mut(a) {
                method.imp = imp_b;
            }
            if let Some(method) = graph.methods.get_mut(b) {
                method.imp = imp_a;
            }

            let mut targets: Vec<usize> = [a, b]
                .into_iter()
                .filter_map(|method| graph.methods.owner(method))
                .filter_map(|owner| graph.batch_target(owner))
                .collect();
            targets.dedup();
            for index in targets {
                graph.update_dtable(index);
            }
            Ok(())
        })
    }
}
