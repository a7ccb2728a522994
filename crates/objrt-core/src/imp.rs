//! Method implementation handles

use crate::class::Class;
use crate::runtime::Runtime;
use crate::selector::SelectorId;
use std::sync::Arc;

/// Signature of an implementation body
///
/// Invoked with the runtime, the receiving class and the selector that was
/// resolved. Class-side hooks (`load`, `initialize`) receive the instance-side
/// class record.
pub type ImpFn = dyn Fn(&Runtime, &Class, SelectorId) + Send + Sync;

/// Implementation handle stored in method batches and dispatch tables
///
/// Two handles are equal only when they share the same body, so identity
/// survives cloning into dispatch tables and back out of lookups.
#[derive(Clone)]
pub struct Imp {
    symbol: Option<Arc<str>>,
    func: Arc<ImpFn>,
}

impl Imp {
    /// Create an implementation from a closure
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Runtime, &Class, SelectorId) + Send + Sync + 'static,
    {
        Self {
            symbol: None,
            func: Arc::new(func),
        }
    }

    /// Create an implementation carrying a symbol name
    pub fn named<F>(symbol: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&Runtime, &Class, SelectorId) + Send + Sync + 'static,
    {
        Self {
            symbol: Some(symbol.into()),
            func: Arc::new(func),
        }
    }

    /// Create a do-nothing implementation identified only by its symbol
    ///
    /// Stands in for code that lives outside the runtime (compiled method
    /// bodies referenced from a manifest, test fixtures).
    pub fn stub(symbol: impl Into<Arc<str>>) -> Self {
        Self::named(symbol, |_, _, _| {})
    }

    /// Symbol name, if one was given
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Invoke the implementation
    pub fn call(&self, runtime: &Runtime, receiver: &Class, sel: SelectorId) {
        (self.func)(runtime, receiver, sel)
    }

    /// Check whether two handles share the same body
    pub fn ptr_eq(&self, other: &Imp) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.func), Arc::as_ptr(&other.func))
    }
}

impl PartialEq for Imp {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Imp {}

impl std::fmt::Debug for Imp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "Imp({})", symbol),
            None => write!(f, "Imp({:p})", Arc::as_ptr(&self.func) as *const ()),
        }
    }
}
