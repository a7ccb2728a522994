//! Class records, the class table and the class graph
//!
//! Records live in an arena owned by [`ClassGraph`] and refer to each other
//! by index. The public face of a record is the [`Class`] handle, which also
//! carries the atomically published status flags and finalized instance size.

mod category;
mod graph;
mod handle;
mod ivar;
mod method;
mod record;
mod table;

pub(crate) use category::{Category, CategoryStore};
pub(crate) use graph::ClassGraph;
pub use handle::{Class, ClassInfo};
pub use ivar::{Ivar, IvarOffsetSlot};
pub(crate) use method::{BatchId, BatchOwner, Method, MethodArena, Side};
pub use method::{MethodList, MethodRef};
pub(crate) use record::{ClassRecord, Layout};
pub(crate) use table::ClassTable;

/// Snapshot of the class table
///
/// `total` counts every name binding at snapshot time (aliases included);
/// `classes` holds at most the requested number of handles.
#[derive(Debug, Clone, Default)]
pub struct ClassList {
    /// Number of name bindings in the table
    pub total: usize,
    /// Class handles, in table order
    pub classes: Vec<Class>,
}
