//! Class record storage

use super::{BatchId, Class, Ivar};
use crate::dtable::DispatchTable;
use std::sync::Arc;

/// Instance layout state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layout {
    /// Declared size of the class's own ivars; superclass not yet accounted for
    Declared(usize),
    /// Final instance size including every ancestor
    Finalized(usize),
}

/// One class or metaclass record
#[derive(Debug)]
pub(crate) struct ClassRecord {
    pub class: Class,
    /// Index of the paired record (metaclass for a class, class for a metaclass)
    pub pair: usize,
    pub superclass_name: Option<Arc<str>>,
    /// Resolved superclass index, set at link time
    pub superclass: Option<usize>,
    pub layout: Layout,
    pub ivars: Vec<Ivar>,
    /// Own method chain, newest batch first
    pub methods: Vec<BatchId>,
    /// Direct subclasses, append-only
    pub subclasses: Vec<usize>,
    pub dtable: Arc<DispatchTable>,
}

impl ClassRecord {
    pub fn new(
        class: Class,
        pair: usize,
        superclass_name: Option<Arc<str>>,
        layout: Layout,
        dtable: Arc<DispatchTable>,
    ) -> Self {
        Self {
            class,
            pair,
            superclass_name,
            superclass: None,
            layout,
            ivars: Vec::new(),
            methods: Vec::new(),
            subclasses: Vec::new(),
            dtable,
        }
    }

    pub fn is_metaclass(&self) -> bool {
        self.class.is_metaclass()
    }
}
