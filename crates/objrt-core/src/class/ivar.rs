//! Instance variable descriptors

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Externally visible offset variable for one ivar
///
/// Compiled code that addresses ivars through a global offset variable
/// shares one of these with the runtime; linking slides it together with the
/// descriptor so both always agree.
#[derive(Debug, Clone)]
pub struct IvarOffsetSlot(Arc<AtomicI64>);

impl IvarOffsetSlot {
    /// Create a slot holding the compiler-emitted offset
    pub fn new(offset: i64) -> Self {
        IvarOffsetSlot(Arc::new(AtomicI64::new(offset)))
    }

    /// Current offset
    pub fn get(&self) -> i64 {
        self.0.load(Ordering::Acquire)
    }

    fn slide(&self, by: i64) -> i64 {
        self.0.fetch_add(by, Ordering::AcqRel) + by
    }
}

/// Instance variable descriptor
#[derive(Debug, Clone)]
pub struct Ivar {
    name: String,
    type_encoding: String,
    offset: i64,
    slot: Option<IvarOffsetSlot>,
}

impl Ivar {
    pub(crate) fn new(
        name: String,
        type_encoding: String,
        offset: i64,
        slot: Option<IvarOffsetSlot>,
    ) -> Self {
        Self {
            name,
            type_encoding,
            offset,
            slot,
        }
    }

    /// Ivar name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type encoding of the ivar
    pub fn type_encoding(&self) -> &str {
        &self.type_encoding
    }

    /// Byte offset within the object
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Shift the offset by the superclass layout slide
    pub(crate) fn slide(&mut self, by: i64) {
        self.offset = self
            .offset
            .checked_add(by)
            .unwrap_or_else(|| panic!("offset of ivar {} overflows", self.name));
        if let Some(slot) = &self.slot {
            let published = slot.slide(by);
            assert_eq!(
                published, self.offset,
                "offset slot of ivar {} disagrees with its descriptor",
                self.name
            );
        }
    }
}
