//! Class handles and status flags

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

/// Class status and kind flags
///
/// Status bits are monotonic: once set they are never cleared.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ClassInfo(u32);

impl ClassInfo {
    /// Instance-side class record
    pub const CLASS: ClassInfo = ClassInfo(0x001);
    /// Metaclass record
    pub const METACLASS: ClassInfo = ClassInfo(0x002);
    /// Bound into the class table
    pub const REGISTERED: ClassInfo = ClassInfo(0x020);
    /// Superclass resolved and instance layout finalized
    pub const LINKED: ClassInfo = ClassInfo(0x100);
    /// `load` hook has run (or the class has none)
    pub const LOADED: ClassInfo = ClassInfo(0x200);
    /// Dispatch table maintenance enabled
    pub const DTABLE: ClassInfo = ClassInfo(0x400);
    /// `initialize` hook has run (or is running)
    pub const INITIALIZED: ClassInfo = ClassInfo(0x800);

    /// Empty flag set
    pub const fn empty() -> Self {
        ClassInfo(0)
    }

    /// Raw bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check whether every bit of `other` is set
    pub const fn contains(self, other: ClassInfo) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ClassInfo {
    type Output = ClassInfo;

    fn bitor(self, rhs: ClassInfo) -> ClassInfo {
        ClassInfo(self.0 | rhs.0)
    }
}

pub(crate) struct ClassHeader {
    index: usize,
    name: Arc<str>,
    info: AtomicU32,
    instance_size: AtomicUsize,
}

/// Handle to a class record
///
/// Cheap to clone. Equality is record identity: handles compare equal only if
/// they were handed out for the same registration.
#[derive(Clone)]
pub struct Class(Arc<ClassHeader>);

impl Class {
    pub(crate) fn new(index: usize, name: Arc<str>, kind: ClassInfo) -> Self {
        Class(Arc::new(ClassHeader {
            index,
            name,
            info: AtomicU32::new(kind.bits()),
            instance_size: AtomicUsize::new(0),
        }))
    }

    /// Class name (metaclasses share the name of their class)
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Current status flags
    pub fn info(&self) -> ClassInfo {
        ClassInfo(self.0.info.load(Ordering::Acquire))
    }

    /// Check whether this is a metaclass record
    pub fn is_metaclass(&self) -> bool {
        self.info().contains(ClassInfo::METACLASS)
    }

    /// Check whether the superclass chain has been resolved
    pub fn is_linked(&self) -> bool {
        self.info().contains(ClassInfo::LINKED)
    }

    /// Check whether the one-time initialization has started
    pub fn is_initialized(&self) -> bool {
        self.info().contains(ClassInfo::INITIALIZED)
    }

    pub(crate) fn index(&self) -> usize {
        self.0.index
    }

    pub(crate) fn insert_info(&self, flags: ClassInfo) {
        self.0.info.fetch_or(flags.bits(), Ordering::Release);
    }

    /// Finalized instance size; meaningful once the class is linked
    pub(crate) fn finalized_size(&self) -> usize {
        self.0.instance_size.load(Ordering::Acquire)
    }

    pub(crate) fn publish_size(&self, size: usize) {
        self.0.instance_size.store(size, Ordering::Release);
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Class {}

impl std::hash::Hash for Class {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state)
    }
}

impl std::fmt::Debug for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_metaclass() {
            write!(f, "Class({} meta)", self.name())
        } else {
            write!(f, "Class({})", self.name())
        }
    }
}
