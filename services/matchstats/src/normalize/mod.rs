//! Raw entries -> canonical, duplicate-free match records
//!
//! 1. Canonicalize each entry into name-ordered primary/secondary slots
//! 2. Derive the identity key of every canonical entry
//! 3. Keep the first entry seen per identity key

pub mod canonical;
pub mod dedup;
pub mod pipeline;

pub use canonical::*;
pub use dedup::*;
pub use pipeline::*;
