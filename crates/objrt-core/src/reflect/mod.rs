//! Reflection surface
//!
//! Queries and mutations on classes and methods, all exposed as methods on
//! [`Runtime`](crate::Runtime).
//!
//! ## Class introspection
//!
//! | Method                   | Description                                   |
//! |--------------------------|-----------------------------------------------|
//! | `class_named`            | Class table lookup, no linking                |
//! | `lookup_class`           | Lookup that links on demand                   |
//! | `require_class`          | Lookup that reports a missing class           |
//! | `superclass`             | Resolved superclass                           |
//! | `metaclass_of`           | Paired metaclass                              |
//! | `is_subclass_of`         | Superclass chain membership                   |
//! | `instance_size`          | Finalized instance size                       |
//! | `ivar` / `ivar_list`     | Instance variable descriptors                 |
//! | `method`                 | Method entry by selector, searching ancestors |
//! | `lookup_implementation`  | Dispatch table lookup                         |
//! | `type_encoding`          | Type encoding declared for a selector         |
//!
//! ## Methods
//!
//! | Method                     | Description                                 |
//! |----------------------------|---------------------------------------------|
//! | `copy_method_list`         | Caller-owned list of a class's own methods  |
//! | `method_return_type`       | Return type decoded from the type encoding  |
//! | `method_argument_count`    | Argument count decoded from the encoding    |
//! | `replace_method`           | Swap in a new implementation for a selector |
//! | `exchange_implementations` | Swap the implementations of two methods     |
//!
//! Read queries initialize the classes they touch first, so they always see
//! linked classes with built dispatch tables.

mod introspection;
mod methods;

pub use introspection::ivar_offset;
