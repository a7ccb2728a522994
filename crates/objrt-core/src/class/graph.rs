//! The class graph: every record, the class table and the method storage
//!
//! All state guarded by the runtime's global lock lives here. Linking,
//! dispatch table construction and hook bookkeeping extend this type from
//! their own modules.

use super::{
    BatchId, BatchOwner, Category, CategoryStore, Class, ClassInfo, ClassRecord, ClassTable, Ivar,
    Layout, Method, MethodArena, Side,
};
use crate::dtable::DispatchTable;
use crate::imp::Imp;
use crate::loader::LoadQueue;
use crate::selector::{SelectorId, SelectorRegistry};
use crate::symtab::{CategoryDef, ClassDef, MethodDef};
use std::sync::Arc;

#[derive(Debug)]
pub(crate) struct ClassGraph {
    pub records: Vec<ClassRecord>,
    pub table: ClassTable,
    pub categories: CategoryStore,
    pub methods: MethodArena,
    pub load_queue: LoadQueue,
    /// Shared table aliased by every record until its own table is built
    pub empty_dtable: Arc<DispatchTable>,
    pub warn_legacy_offsets: bool,
}

impl ClassGraph {
    pub fn new(empty_dtable: Arc<DispatchTable>, warn_legacy_offsets: bool) -> Self {
        Self {
            records: Vec::new(),
            table: ClassTable::new(),
            categories: CategoryStore::new(),
            methods: MethodArena::new(),
            load_queue: LoadQueue::new(),
            empty_dtable,
            warn_legacy_offsets,
        }
    }

    /// Arena index of a handle, if it belongs to this graph
    pub fn resolve(&self, class: &Class) -> Option<usize> {
        let index = class.index();
        let record = self.records.get(index)?;
        (record.class == *class).then_some(index)
    }

    /// Index of the instance-side record of a class or metaclass
    pub fn instance_side(&self, index: usize) -> usize {
        let record = &self.records[index];
        if record.is_metaclass() {
            record.pair
        } else {
            index
        }
    }

    pub fn record(&self, index: usize) -> &ClassRecord {
        &self.records[index]
    }

    pub fn class(&self, index: usize) -> Class {
        self.records[index].class.clone()
    }

    /// Which category method set applies to a record
    pub fn side(&self, index: usize) -> Side {
        if self.records[index].is_metaclass() {
            Side::Class
        } else {
            Side::Instance
        }
    }

    /// Look up a class by name; instance-side index
    pub fn named(&self, name: &str) -> Option<usize> {
        self.table.get(name)
    }

    fn method_batch(
        &mut self,
        owner: BatchOwner,
        defs: Vec<MethodDef>,
        selectors: &dyn SelectorRegistry,
    ) -> Option<BatchId> {
        if defs.is_empty() {
            return None;
        }
        let methods = defs
            .into_iter()
            .map(|def| Method {
                sel: selectors.register(&def.selector),
                types: Arc::from(def.types),
                imp: def.imp,
            })
            .collect();
        Some(self.methods.alloc(owner, methods))
    }

    /// Create the class and metaclass records and bind the name
    ///
    /// Every selector the class declares, on both sides, is registered.
    pub fn register_class(&mut self, def: ClassDef, selectors: &dyn SelectorRegistry) -> Class {
        let index = self.records.len();
        let meta_index = index + 1;
        let name: Arc<str> = Arc::from(def.name.as_str());
        let superclass_name: Option<Arc<str>> = def.superclass.as_deref().map(Arc::from);
        let declared = def.declared_size();

        let class = Class::new(index, name.clone(), ClassInfo::CLASS | ClassInfo::REGISTERED);
        let meta = Class::new(
            meta_index,
            name.clone(),
            ClassInfo::METACLASS | ClassInfo::REGISTERED,
        );

        let mut record = ClassRecord::new(
            class.clone(),
            meta_index,
            superclass_name.clone(),
            Layout::Declared(declared),
            self.empty_dtable.clone(),
        );
        record.ivars = def
            .ivars
            .into_iter()
            .map(|ivar| Ivar::new(ivar.name, ivar.type_encoding, ivar.offset, ivar.slot))
            .collect();
        record
            .methods
            .extend(self.method_batch(BatchOwner::Class(index), def.methods, selectors));

        let mut meta_record = ClassRecord::new(
            meta,
            index,
            superclass_name,
            Layout::Finalized(0),
            self.empty_dtable.clone(),
        );
        meta_record.methods.extend(self.method_batch(
            BatchOwner::Class(meta_index),
            def.class_methods,
            selectors,
        ));

        self.records.push(record);
        self.records.push(meta_record);
        self.table.insert(name, index);
        class
    }

    /// Store a category; dispatch tables are left untouched
    pub fn register_category(&mut self, def: CategoryDef, selectors: &dyn SelectorRegistry) -> usize {
        let index = self.categories.len();
        let instance_methods = self.method_batch(
            BatchOwner::Category {
                index,
                side: Side::Instance,
            },
            def.instance_methods,
            selectors,
        );
        let class_methods = self.method_batch(
            BatchOwner::Category {
                index,
                side: Side::Class,
            },
            def.class_methods,
            selectors,
        );
        self.categories.insert(Category {
            name: Arc::from(def.name),
            class_name: Arc::from(def.class_name),
            instance_methods,
            class_methods,
        })
    }

    /// Record whose dispatch table a method batch feeds
    pub fn batch_target(&self, owner: BatchOwner) -> Option<usize> {
        match owner {
            BatchOwner::Class(index) => Some(index),
            BatchOwner::Category { index, side } => {
                let category = self.categories.get(index)?;
                let class = self.table.get(&category.class_name)?;
                match side {
                    Side::Instance => Some(class),
                    Side::Class => Some(self.records[class].pair),
                }
            }
        }
    }

    /// Check whether a class's metaclass declares `sel` among its own methods
    pub fn has_hook(&self, index: usize, sel: SelectorId) -> bool {
        let meta = self.records[index].pair;
        self.methods
            .find_in_chain(&self.records[meta].methods, sel)
            .is_some()
    }

    /// Every implementation of `sel` among a metaclass's own methods, in chain order
    pub fn collect_hooks(&self, index: usize, sel: SelectorId) -> Vec<Imp> {
        let meta = self.records[index].pair;
        self.methods
            .iter_chain(&self.records[meta].methods)
            .filter(|(_, method)| method.sel == sel)
            .map(|(_, method)| method.imp.clone())
            .collect()
    }

    /// Resolved superclass chain starting at `index`, the class itself first
    pub fn ancestry(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(index), move |current| self.records[*current].superclass)
    }
}
