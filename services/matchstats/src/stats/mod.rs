//! Filtering and win-rate statistics over normalized records

pub mod aggregate;
pub mod filter;
pub mod options;

pub use aggregate::*;
pub use filter::*;
pub use options::*;
