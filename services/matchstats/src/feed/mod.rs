pub mod csv_feed;
pub mod memory;
pub mod submission;
pub mod traits;

pub use csv_feed::CsvFeed;
pub use memory::MemoryFeed;
pub use submission::{FieldInput, MatchSubmission, Submitter};
pub use traits::{FeedRow, MatchFeed};
