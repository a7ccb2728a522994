//! objrt Core Runtime
//!
//! This crate provides the class/method-dispatch core of the objrt object runtime:
//! - Class table (name to class record mapping)
//! - Lazy class linking (superclass resolution and instance layout)
//! - Dispatch tables built across inheritance and category overlays
//! - One-time `load` and `initialize` hook sequencing
//! - Reflection and introspection queries, method replacement
//!
//! Everything hangs off a [`Runtime`], the service object that owns the
//! global lock and the class graph.
//!
//! # Example
//!
//! ```rust,ignore
//! use objrt_core::{ClassDef, Imp, Runtime, RuntimeOptions, SymbolTable};
//!
//! let rt = Runtime::new(RuntimeOptions::default());
//! rt.register_symbol_table(
//!     SymbolTable::new()
//!         .with_class(ClassDef::new("Root", 8).with_method("foo", "v16@0:8", Imp::stub("Root.foo")))
//!         .with_class(ClassDef::new("Leaf", 4).with_superclass("Root")),
//! );
//!
//! let leaf = rt.lookup_class("Leaf").unwrap();
//! assert_eq!(rt.instance_size(&leaf), Some(12));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![allow(clippy::new_without_default)]

pub mod class;
pub mod dispatch;
pub mod dtable;
pub mod encoding;
pub mod imp;
pub mod initializer;
pub mod linker;
pub mod loader;
pub mod options;
pub mod reflect;
pub mod runtime;
pub mod selector;
pub mod symtab;

pub use class::{Class, ClassInfo, ClassList, Ivar, IvarOffsetSlot, MethodList, MethodRef};
pub use dtable::DispatchTable;
pub use encoding::{EncodedArg, EncodingError, TypeEncoding};
pub use imp::{Imp, ImpFn};
pub use loader::LoadReport;
pub use options::RuntimeOptions;
pub use reflect::ivar_offset;
pub use runtime::Runtime;
pub use selector::{SelectorId, SelectorRegistry, SelectorTable};
pub use symtab::{CategoryDef, ClassDef, IvarDef, MethodDef, SymbolTable};

/// Runtime errors
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// No class is bound to the name, or it cannot be linked
    #[error("Class {0} not found")]
    ClassNotFound(String),

    /// The class table has not been populated yet (or was torn down)
    #[error("Class table not initialized")]
    TableNotInitialized,

    /// The class exists but its superclass chain cannot be resolved
    #[error("Class {0} is not linked")]
    Unlinked(String),

    /// A method reference does not name a method of this runtime
    #[error("Method not found")]
    MethodNotFound,

    /// A method type encoding could not be decoded
    #[error("Invalid type encoding: {0}")]
    Encoding(#[from] EncodingError),
}

/// Runtime result
pub type RuntimeResult<T> = Result<T, RuntimeError>;
