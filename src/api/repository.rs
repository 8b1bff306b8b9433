use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::overlap::find_conflicts;
use crate::core::{WorkOrder, WorkOrderId};
use crate::error::{TimelineError, TimelineResult};

/// Store of work orders the timeline reads snapshots from.
///
/// Implementations own the order set. The engine never mutates orders
/// directly; it asks the repository and reloads the snapshot afterwards.
pub trait WorkOrderRepository {
    /// All orders in a stable order.
    fn get_all(&self) -> Vec<WorkOrder>;

    fn get(&self, id: &WorkOrderId) -> Option<WorkOrder>;

    fn create(&mut self, order: WorkOrder) -> TimelineResult<()>;

    /// Replaces the order with the same id.
    fn update(&mut self, order: WorkOrder) -> TimelineResult<()>;

    fn delete(&mut self, id: &WorkOrderId) -> TimelineResult<WorkOrder>;

    /// Monotonic change token, bumped on every successful mutation.
    fn revision(&self) -> u64;
}

/// Insertion-ordered repository that rejects overlapping orders on write.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkOrderRepository {
    orders: IndexMap<WorkOrderId, WorkOrder>,
    revision: u64,
}

impl InMemoryWorkOrderRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the repository, validating every order against those before it.
    pub fn with_orders(orders: impl IntoIterator<Item = WorkOrder>) -> TimelineResult<Self> {
        let mut repository = Self::new();
        for order in orders {
            repository.create(order)?;
        }
        Ok(repository)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Checks `candidate` against the stored orders, ignoring `ignore_id`.
    pub fn check_overlap(
        &self,
        candidate: &WorkOrder,
        ignore_id: Option<&WorkOrderId>,
    ) -> TimelineResult<()> {
        let conflicts = find_conflicts(candidate, self.orders.values(), ignore_id);
        if let Some(conflict) = conflicts.first() {
            warn!(
                candidate = %candidate.id,
                existing = %conflict.id,
                work_center = %candidate.work_center_id,
                conflicts = conflicts.len(),
                "rejecting overlapping work order"
            );
            return Err(TimelineError::Overlap {
                candidate: candidate.id.to_string(),
                existing: conflict.id.to_string(),
                work_center: candidate.work_center_id.to_string(),
            });
        }
        Ok(())
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }
}

impl WorkOrderRepository for InMemoryWorkOrderRepository {
    fn get_all(&self) -> Vec<WorkOrder> {
        self.orders.values().cloned().collect()
    }

    fn get(&self, id: &WorkOrderId) -> Option<WorkOrder> {
        self.orders.get(id).cloned()
    }

    fn create(&mut self, order: WorkOrder) -> TimelineResult<()> {
        order.validate()?;
        if self.orders.contains_key(&order.id) {
            warn!(order = %order.id, "rejecting duplicate work order");
            return Err(TimelineError::DuplicateWorkOrder(order.id.to_string()));
        }
        self.check_overlap(&order, None)?;
        debug!(order = %order.id, work_center = %order.work_center_id, "created work order");
        self.orders.insert(order.id.clone(), order);
        self.bump_revision();
        Ok(())
    }

    fn update(&mut self, order: WorkOrder) -> TimelineResult<()> {
        order.validate()?;
        if !self.orders.contains_key(&order.id) {
            return Err(TimelineError::WorkOrderNotFound(order.id.to_string()));
        }
        self.check_overlap(&order, Some(&order.id))?;
        debug!(order = %order.id, "updated work order");
        // `insert` on an existing key keeps its position.
        self.orders.insert(order.id.clone(), order);
        self.bump_revision();
        Ok(())
    }

    fn delete(&mut self, id: &WorkOrderId) -> TimelineResult<WorkOrder> {
        let removed = self
            .orders
            .shift_remove(id)
            .ok_or_else(|| TimelineError::WorkOrderNotFound(id.to_string()))?;
        debug!(order = %id, "deleted work order");
        self.bump_revision();
        Ok(removed)
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
