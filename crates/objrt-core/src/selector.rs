//! Selector identities and the selector uniquing registry
//!
//! Selector identity is owned by the registry, not by the class core: the
//! core only asks for a stable [`SelectorId`] per name and compares ids.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Unique identifier for a selector
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectorId(u32);

impl SelectorId {
    /// Get the numeric ID value
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Create a SelectorId from a raw value (for registries backed by other storage)
    pub fn from_u32(id: u32) -> Self {
        SelectorId(id)
    }
}

/// Process-wide selector uniquing registry
///
/// Implementations must hand back the same id for the same name for as long
/// as the registry lives. The runtime registers every selector a class or
/// category declares and looks up hook selectors by name.
pub trait SelectorRegistry: Send + Sync {
    /// Register a selector name, returning its (possibly pre-existing) id
    fn register(&self, name: &str) -> SelectorId;

    /// Look up a selector by name without registering it
    fn lookup(&self, name: &str) -> Option<SelectorId>;

    /// Get the name a selector id was registered under
    fn name(&self, id: SelectorId) -> Option<Arc<str>>;

    /// Number of registered selectors
    fn len(&self) -> usize;

    /// Check if no selector has been registered
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
struct SelectorTableInner {
    ids: FxHashMap<Arc<str>, SelectorId>,
    names: Vec<Arc<str>>,
}

/// In-process selector registry
///
/// Ids are dense and start at 1; id 0 is never handed out.
#[derive(Default)]
pub struct SelectorTable {
    inner: RwLock<SelectorTableInner>,
}

impl SelectorTable {
    /// Create a new empty selector table
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectorRegistry for SelectorTable {
    fn register(&self, name: &str) -> SelectorId {
        if let Some(id) = self.inner.read().ids.get(name) {
            return *id;
        }

        let mut inner = self.inner.write();
        // Another thread may have registered it between the two locks
        if let Some(id) = inner.ids.get(name) {
            return *id;
        }
        let name: Arc<str> = Arc::from(name);
        inner.names.push(name.clone());
        let id = SelectorId(inner.names.len() as u32);
        inner.ids.insert(name, id);
        id
    }

    fn lookup(&self, name: &str) -> Option<SelectorId> {
        self.inner.read().ids.get(name).copied()
    }

    fn name(&self, id: SelectorId) -> Option<Arc<str>> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.inner.read().names.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.inner.read().names.len()
    }
}

impl std::fmt::Debug for SelectorTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorTable")
            .field("len", &self.len())
            .finish()
    }
}
