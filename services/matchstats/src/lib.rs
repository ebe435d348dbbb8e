//! Card-game match records: normalization, deduplication and win-rate statistics
//!
//! Feed rows are parsed into [`record::RawMatchEntry`] values, rewritten into
//! name-ordered [`normalize::CanonicalMatchEntry`] records, deduplicated by
//! identity key and then filtered and aggregated by [`stats`].

pub mod config;
pub mod error;
pub mod feed;
pub mod normalize;
pub mod outputs;
pub mod record;
pub mod stats;

pub use error::{DataQualityWarning, RecordError, SubmissionError};
pub use normalize::{normalize, CanonicalMatchEntry, IdentityKey, Normalized};
pub use record::{Outcome, RawMatchEntry, TurnOrder};
pub use stats::{aggregate_by, filter, turn_order_split, Dimension, FilterState, StatRow};
