//! Bulk registration input
//!
//! A [`SymbolTable`] is what a compiler or loader hands the runtime at startup:
//! class definitions with their ivars and methods, plus categories keyed by
//! the name of the class they extend.

use crate::class::IvarOffsetSlot;
use crate::imp::Imp;

/// One method definition
#[derive(Debug, Clone)]
pub struct MethodDef {
    /// Selector name
    pub selector: String,
    /// Method type encoding
    pub types: String,
    /// Implementation
    pub imp: Imp,
}

impl MethodDef {
    /// Create a method definition
    pub fn new(selector: impl Into<String>, types: impl Into<String>, imp: Imp) -> Self {
        Self {
            selector: selector.into(),
            types: types.into(),
            imp,
        }
    }
}

/// One ivar definition
#[derive(Debug, Clone)]
pub struct IvarDef {
    /// Ivar name
    pub name: String,
    /// Type encoding
    pub type_encoding: String,
    /// Offset relative to the class's own storage
    pub offset: i64,
    /// Externally visible offset variable, if compiled code uses one
    pub slot: Option<IvarOffsetSlot>,
}

impl IvarDef {
    /// Create an ivar definition
    pub fn new(name: impl Into<String>, type_encoding: impl Into<String>, offset: i64) -> Self {
        Self {
            name: name.into(),
            type_encoding: type_encoding.into(),
            offset,
            slot: None,
        }
    }

    /// Attach an offset slot that linking keeps in sync with the descriptor
    pub fn with_slot(mut self, slot: IvarOffsetSlot) -> Self {
        self.slot = Some(slot);
        self
    }
}

/// One class definition
#[derive(Debug, Clone)]
pub struct ClassDef {
    /// Class name
    pub name: String,
    /// Superclass name; `None` for a root class
    pub superclass: Option<String>,
    /// Instance size as emitted by the compiler
    ///
    /// A negative value is the declared-size sentinel: the magnitude is the
    /// size of the class's own ivars and the superclass is added at link time.
    pub instance_size: i64,
    /// Ivars declared by this class
    pub ivars: Vec<IvarDef>,
    /// Instance methods
    pub methods: Vec<MethodDef>,
    /// Class methods, including the `load` and `initialize` hooks
    pub class_methods: Vec<MethodDef>,
}

impl ClassDef {
    /// Create a class definition declaring `declared_size` bytes of its own ivars
    pub fn new(name: impl Into<String>, declared_size: usize) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            instance_size: -(declared_size as i64),
            ivars: Vec::new(),
            methods: Vec::new(),
            class_methods: Vec::new(),
        }
    }

    /// Set the superclass name
    pub fn with_superclass(mut self, name: impl Into<String>) -> Self {
        self.superclass = Some(name.into());
        self
    }

    /// Set the raw compiler-emitted instance size
    pub fn with_raw_instance_size(mut self, raw: i64) -> Self {
        self.instance_size = raw;
        self
    }

    /// Add an ivar
    pub fn with_ivar(mut self, ivar: IvarDef) -> Self {
        self.ivars.push(ivar);
        self
    }

    /// Add an instance method
    pub fn with_method(mut self, selector: impl Into<String>, types: impl Into<String>, imp: Imp) -> Self {
        self.methods.push(MethodDef::new(selector, types, imp));
        self
    }

    /// Add a class method
    pub fn with_class_method(
        mut self,
        selector: impl Into<String>,
        types: impl Into<String>,
        imp: Imp,
    ) -> Self {
        self.class_methods.push(MethodDef::new(selector, types, imp));
        self
    }

    /// Size of the class's own ivars
    pub fn declared_size(&self) -> usize {
        self.instance_size.unsigned_abs() as usize
    }
}

/// One category definition
#[derive(Debug, Clone)]
pub struct CategoryDef {
    /// Category name
    pub name: String,
    /// Name of the class the category extends
    pub class_name: String,
    /// Instance methods
    pub instance_methods: Vec<MethodDef>,
    /// Class methods
    pub class_methods: Vec<MethodDef>,
}

impl CategoryDef {
    /// Create an empty category on `class_name`
    pub fn new(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
            instance_methods: Vec::new(),
            class_methods: Vec::new(),
        }
    }

    /// Add an instance method
    pub fn with_method(mut self, selector: impl Into<String>, types: impl Into<String>, imp: Imp) -> Self {
        self.instance_methods.push(MethodDef::new(selector, types, imp));
        self
    }

    /// Add a class method
    pub fn with_class_method(
        mut self,
        selector: impl Into<String>,
        types: impl Into<String>,
        imp: Imp,
    ) -> Self {
        self.class_methods.push(MethodDef::new(selector, types, imp));
        self
    }
}

/// Classes and categories registered together
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// Class definitions, in emission order
    pub classes: Vec<ClassDef>,
    /// Category definitions, in emission order
    pub categories: Vec<CategoryDef>,
}

impl SymbolTable {
    /// Create an empty symbol table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class definition
    pub fn with_class(mut self, class: ClassDef) -> Self {
        self.classes.push(class);
        self
    }

    /// Add a category definition
    pub fn with_category(mut self, category: CategoryDef) -> Self {
        self.categories.push(category);
        self
    }
}
