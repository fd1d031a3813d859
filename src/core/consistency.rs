//! Pre-write checks and the optimistic uniqueness path shared by every
//! create and rename operation.
//!
//! The existence query only saves a write under normal load; the store's own
//! constraint decides. Both rejections end as the same `Conflict`.

use crate::domain::model::name_key;
use crate::domain::ports::{SaveOutcome, StoreResult};
use crate::utils::error::{CatalogError, Result};
use std::future::Future;

/// Where a duplicate was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateSource {
    /// The existence query found the key before any write.
    PreCheck,
    /// The write reached the store and hit its uniqueness constraint.
    Constraint { constraint: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome<T> {
    Written(T),
    Duplicate(DuplicateSource),
}

impl<T> From<SaveOutcome<T>> for WriteOutcome<T> {
    fn from(outcome: SaveOutcome<T>) -> Self {
        match outcome {
            SaveOutcome::Saved(value) => WriteOutcome::Written(value),
            SaveOutcome::UniqueViolation { constraint } => {
                WriteOutcome::Duplicate(DuplicateSource::Constraint { constraint })
            }
        }
    }
}

impl<T> WriteOutcome<T> {
    /// Collapses both duplicate paths into the caller's conflict error.
    pub fn into_result<F>(self, conflict: F) -> Result<T>
    where
        F: FnOnce() -> CatalogError,
    {
        match self {
            WriteOutcome::Written(value) => Ok(value),
            WriteOutcome::Duplicate(DuplicateSource::PreCheck) => Err(conflict()),
            WriteOutcome::Duplicate(DuplicateSource::Constraint { constraint }) => {
                let err = conflict();
                tracing::warn!(
                    constraint,
                    code = err.code(),
                    "write lost a uniqueness race, store constraint rejected it"
                );
                Err(err)
            }
        }
    }
}

/// Runs the existence query and only then the write.
///
/// `write` is a not-yet-polled future, so nothing reaches the store when the
/// pre-check already reports a duplicate.
pub async fn guarded_write<T, C, W>(exists: C, write: W) -> StoreResult<WriteOutcome<T>>
where
    C: Future<Output = StoreResult<bool>>,
    W: Future<Output = StoreResult<SaveOutcome<T>>>,
{
    if exists.await? {
        return Ok(WriteOutcome::Duplicate(DuplicateSource::PreCheck));
    }
    Ok(write.await?.into())
}

/// Case-insensitive equality on trimmed names.
pub fn same_name(current: &str, requested: &str) -> bool {
    name_key(current) == name_key(requested)
}

pub(crate) fn franchise_not_found(id: impl std::fmt::Display) -> CatalogError {
    CatalogError::not_found("FRANCHISE_NOT_FOUND", format!("Franchise not found: {}", id))
}

pub(crate) fn branch_not_found(id: impl std::fmt::Display) -> CatalogError {
    CatalogError::not_found("BRANCH_NOT_FOUND", format!("Branch not found: {}", id))
}

pub(crate) fn product_not_found(id: impl std::fmt::Display) -> CatalogError {
    CatalogError::not_found("PRODUCT_NOT_FOUND", format!("Product not found: {}", id))
}

pub(crate) fn link_not_found(branch_id: i64, product_id: i64) -> CatalogError {
    CatalogError::not_found(
        "BRANCH_PRODUCT_NOT_FOUND",
        format!(
            "BranchProduct not found for branchId={} and productId={}",
            branch_id, product_id
        ),
    )
}
