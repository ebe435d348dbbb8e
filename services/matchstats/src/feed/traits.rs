use anyhow::Result;
use std::collections::HashMap;

/// One data row of the feed: header -> cell text
pub type FeedRow = HashMap<String, String>;

/// Append-only tabular store holding the raw match rows
pub trait MatchFeed {
    fn name(&self) -> &str;

    /// Every data row currently in the feed, in sheet order
    fn fetch_rows(&self) -> Result<Vec<FeedRow>>;

    /// Append one row; columns the feed does not know are ignored
    fn append_row(&mut self, row: &FeedRow) -> Result<()>;
}
