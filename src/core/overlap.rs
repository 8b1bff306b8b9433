use smallvec::SmallVec;

use crate::core::types::{WorkOrder, WorkOrderId};

/// Inclusive date ranges on the same work center that share at least one day.
///
/// Orders that merely touch (one ends on the day the other starts) overlap,
/// because both occupy that day.
#[must_use]
pub fn overlaps_between(a: &WorkOrder, b: &WorkOrder) -> bool {
    a.work_center_id == b.work_center_id
        && a.start_date.max(b.start_date) <= a.end_date.min(b.end_date)
}

/// Returns `true` when `candidate` collides with any order in `existing`.
///
/// `ignore_id` excludes one order from the check, which lets an edit be
/// validated against the set that still contains its previous version.
#[must_use]
pub fn overlaps<'a, I>(candidate: &WorkOrder, existing: I, ignore_id: Option<&WorkOrderId>) -> bool
where
    I: IntoIterator<Item = &'a WorkOrder>,
{
    conflicting(candidate, existing, ignore_id).next().is_some()
}

/// Every order in `existing` that collides with `candidate`.
#[must_use]
pub fn find_conflicts<'a, I>(
    candidate: &WorkOrder,
    existing: I,
    ignore_id: Option<&WorkOrderId>,
) -> SmallVec<[&'a WorkOrder; 2]>
where
    I: IntoIterator<Item = &'a WorkOrder>,
{
    conflicting(candidate, existing, ignore_id).collect()
}

fn conflicting<'a, 'c, I>(
    candidate: &'c WorkOrder,
    existing: I,
    ignore_id: Option<&'c WorkOrderId>,
) -> impl Iterator<Item = &'a WorkOrder>
where
    I: IntoIterator<Item = &'a WorkOrder>,
{
    existing
        .into_iter()
        .filter(move |order| ignore_id != Some(&order.id))
        .filter(move |order| overlaps_between(candidate, order))
}
