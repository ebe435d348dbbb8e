use anyhow::Result;

use crate::feed::traits::{FeedRow, MatchFeed};

/// Feed kept in memory, for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryFeed {
    rows: Vec<FeedRow>,
}

impl MemoryFeed {
    pub fn new(rows: Vec<FeedRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FeedRow] {
        &self.rows
    }
}

impl MatchFeed for MemoryFeed {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch_rows(&self) -> Result<Vec<FeedRow>> {
        Ok(self.rows.clone())
    }

    fn append_row(&mut self, row: &FeedRow) -> Result<()> {
        self.rows.push(row.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_feed_append() {
        let mut feed = MemoryFeed::default();
        assert!(feed.fetch_rows().unwrap().is_empty());

        let row: FeedRow = [("氏名".to_string(), "Alice".to_string())].into_iter().collect();
        feed.append_row(&row).unwrap();

        assert_eq!(feed.fetch_rows().unwrap(), vec![row]);
        assert_eq!(feed.name(), "memory");
    }
}
