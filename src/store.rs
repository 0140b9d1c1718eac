use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::models::{NormalizedReview, ReviewStatus};

/// Publication flags keyed by review id.
///
/// The store is the authority on approval once seeded: the `is_approved`
/// value computed at normalization time is only used as the initial entry.
/// All access goes through a single lock, so a store can be shared between
/// request handlers behind an `Arc`.
#[derive(Debug, Default)]
pub struct ApprovalStore {
    approvals: RwLock<HashMap<i64, bool>>,
}

impl ApprovalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds entries from normalization-time approval. Ids that already have
    /// an entry keep it, so calling this again never reverts manual changes.
    /// Returns the number of entries created.
    pub fn initialize(&self, reviews: &[NormalizedReview]) -> usize {
        let mut approvals = self.write();
        let mut inserted = 0usize;
        for review in reviews {
            if let Entry::Vacant(entry) = approvals.entry(review.id) {
                entry.insert(review.is_approved);
                inserted += 1;
            }
        }
        debug!(inserted, total = approvals.len(), "approval store seeded");
        inserted
    }

    /// Unknown ids are not approved.
    pub fn is_approved(&self, review_id: i64) -> bool {
        self.read().get(&review_id).copied().unwrap_or(false)
    }

    /// Blind overwrite; ids that were never seeded are inserted as-is.
    pub fn set_approval(&self, review_id: i64, approved: bool) -> bool {
        info!(review_id, approved, "setting review approval");
        self.write().insert(review_id, approved);
        true
    }

    pub fn approved_only(&self, reviews: &[NormalizedReview]) -> Vec<NormalizedReview> {
        let approvals = self.read();
        reviews
            .iter()
            .filter(|review| approvals.get(&review.id).copied().unwrap_or(false))
            .cloned()
            .collect()
    }

    /// Every review with approval taken from the store and status collapsed
    /// to `published` / `unpublished` accordingly. `pending` never survives.
    pub fn with_approval_merged(&self, reviews: &[NormalizedReview]) -> Vec<NormalizedReview> {
        let approvals = self.read();
        reviews
            .iter()
            .map(|review| {
                let approved = approvals.get(&review.id).copied().unwrap_or(false);
                NormalizedReview {
                    is_approved: approved,
                    status: if approved {
                        ReviewStatus::Published
                    } else {
                        ReviewStatus::Unpublished
                    },
                    ..review.clone()
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the current map, ordered by id.
    pub fn snapshot(&self) -> BTreeMap<i64, bool> {
        self.read().iter().map(|(id, approved)| (*id, *approved)).collect()
    }

    // A panic while holding the lock cannot leave the map half-written, so
    // poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<i64, bool>> {
        self.approvals.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<i64, bool>> {
        self.approvals.write().unwrap_or_else(PoisonError::into_inner)
    }
}
