//! Compiled-in textbook content
//!
//! The module catalog and the tutor's chat rules. Both are constant tables;
//! nothing here is mutated at runtime.

pub mod catalog;
pub mod tutor;

pub use catalog::MODULES;
pub use tutor::respond;
