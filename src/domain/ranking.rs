use crate::domain::model::TopStockRow;
use std::cmp::{Ordering, Reverse};
use std::collections::btree_map::{Entry, IntoValues};
use std::collections::BTreeMap;

/// Winning rows, one per branch, by ascending branch id.
pub type TopPerBranch = IntoValues<i64, TopStockRow>;

/// Orders two candidate rows of the same branch: higher stock first, then the
/// lower product id.
pub fn compare_candidates(a: &TopStockRow, b: &TopStockRow) -> Ordering {
    (a.stock, Reverse(a.product_id)).cmp(&(b.stock, Reverse(b.product_id)))
}

/// Keeps the best row of every branch and yields them by ascending branch id.
///
/// Input order does not influence the result, so rows that were already
/// ranked by the store pass through unchanged.
pub fn top_per_branch<I>(rows: I) -> TopPerBranch
where
    I: IntoIterator<Item = TopStockRow>,
{
    let mut best: BTreeMap<i64, TopStockRow> = BTreeMap::new();

    for row in rows {
        match best.entry(row.branch_id) {
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
            Entry::Occupied(mut slot) => {
                if compare_candidates(&row, slot.get()) == Ordering::Greater {
                    slot.insert(row);
                }
            }
        }
    }

    best.into_values()
}
