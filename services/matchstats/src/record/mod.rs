//! Typed match entries as reported by one participant

pub mod columns;
pub mod model;
pub mod parse;

pub use model::*;
pub use parse::*;
