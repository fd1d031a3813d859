use crate::domain::model::TopStockEntry;
use crate::domain::ports::ReportingQuery;
use crate::domain::ranking::{self, TopPerBranch};
use crate::utils::error::Result;
use crate::utils::validation::require_id;

/// Lazily yields the top-stock product of each branch, by ascending branch id.
#[derive(Debug)]
pub struct Leaderboard {
    rows: TopPerBranch,
}

impl Iterator for Leaderboard {
    type Item = TopStockEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(TopStockEntry::from)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

/// Per-branch top-stock report for a franchise.
///
/// The reporting query is expected to rank already; the rows are ranked again
/// here with the same rule so that ties never depend on how the store ordered them.
#[derive(Clone)]
pub struct LeaderboardComputer<S> {
    store: S,
}

impl<S: ReportingQuery> LeaderboardComputer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn compute(&self, franchise_id: i64) -> Result<Leaderboard> {
        let franchise_id = require_id("FRANCHISE_ID_REQUIRED", "franchiseId", franchise_id)?;

        let rows = self.store.top_stock_per_branch(franchise_id).await?;
        tracing::debug!(franchise_id, candidates = rows.len(), "computing top stock per branch");

        Ok(Leaderboard {
            rows: ranking::top_per_branch(rows),
        })
    }
}
