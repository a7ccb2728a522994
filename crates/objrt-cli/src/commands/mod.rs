//! Subcommand implementations

pub mod check;
pub mod classes;
pub mod inspect;
