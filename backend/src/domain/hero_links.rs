//! Hero to superpower link sets and their reconciliation.
//!
//! A hero's links are always replaced wholesale. Adapters read the links that
//! exist, then apply the [`LinkPlan`] diff inside the same transaction.

use std::collections::HashSet;

use super::SuperpowerId;

/// Requested superpower ids with duplicates removed.
///
/// The first occurrence of each id wins, so iteration follows request order.
///
/// # Examples
/// ```
/// use heroes_api::domain::{SuperpowerId, SuperpowerIds};
///
/// let ids = SuperpowerIds::from_requested([3, 1, 3, 2].map(SuperpowerId::new));
/// let raw: Vec<i32> = ids.iter().map(|id| id.get()).collect();
/// assert_eq!(raw, vec![3, 1, 2]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuperpowerIds(Vec<SuperpowerId>);

impl SuperpowerIds {
    pub fn from_requested(requested: impl IntoIterator<Item = SuperpowerId>) -> Self {
        let mut seen = HashSet::new();
        Self(
            requested
                .into_iter()
                .filter(|id| seen.insert(*id))
                .collect(),
        )
    }

    /// Ids in first-occurrence order.
    pub fn as_slice(&self) -> &[SuperpowerId] {
        self.0.as_slice()
    }

    /// Iterate ids in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = SuperpowerId> + '_ {
        self.0.iter().copied()
    }

    /// Whether `id` was requested.
    pub fn contains(&self, id: SuperpowerId) -> bool {
        self.0.contains(&id)
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no superpower was requested.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Link changes needed to move a hero from its current set to the requested one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPlan {
    to_remove: Vec<SuperpowerId>,
    to_add: Vec<SuperpowerId>,
}

impl LinkPlan {
    /// Diff `existing` against `requested`.
    ///
    /// `to_remove` keeps the order of `existing`; `to_add` keeps request order.
    ///
    /// # Examples
    /// ```
    /// use heroes_api::domain::{LinkPlan, SuperpowerId, SuperpowerIds};
    ///
    /// let existing = [1, 2].map(SuperpowerId::new);
    /// let requested = SuperpowerIds::from_requested([2, 5].map(SuperpowerId::new));
    /// let plan = LinkPlan::reconcile(&existing, &requested);
    /// assert_eq!(plan.to_remove(), &[SuperpowerId::new(1)]);
    /// assert_eq!(plan.to_add(), &[SuperpowerId::new(5)]);
    /// ```
    pub fn reconcile(existing: &[SuperpowerId], requested: &SuperpowerIds) -> Self {
        let current: HashSet<SuperpowerId> = existing.iter().copied().collect();
        let to_remove = existing
            .iter()
            .copied()
            .filter(|id| !requested.contains(*id))
            .collect();
        let to_add = requested.iter().filter(|id| !current.contains(id)).collect();
        Self { to_remove, to_add }
    }

    pub fn to_remove(&self) -> &[SuperpowerId] {
        self.to_remove.as_slice()
    }

    pub fn to_add(&self) -> &[SuperpowerId] {
        self.to_add.as_slice()
    }

    /// True when the stored links already match the request.
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }
}
