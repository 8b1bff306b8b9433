use serde::{Deserialize, Serialize};

use crate::core::{DateColumn, WorkOrder, WorkOrderId};

use super::layout_cache::GridLayoutSnapshot;

/// Focused order, drilled-in column and the single open action menu.
///
/// The three fields are independent: drilling into a column keeps focus, and
/// opening a menu does not move focus.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimelineSelection {
    selected_column: Option<DateColumn>,
    focused_order: Option<WorkOrderId>,
    open_menu: Option<WorkOrderId>,
}

impl TimelineSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selected_column(&self) -> Option<&DateColumn> {
        self.selected_column.as_ref()
    }

    #[must_use]
    pub fn focused_order_id(&self) -> Option<&WorkOrderId> {
        self.focused_order.as_ref()
    }

    #[must_use]
    pub fn open_menu(&self) -> Option<&WorkOrderId> {
        self.open_menu.as_ref()
    }

    #[must_use]
    pub fn is_menu_open(&self, id: &WorkOrderId) -> bool {
        self.open_menu.as_ref() == Some(id)
    }

    #[must_use]
    pub fn is_column_selected(&self, column: &DateColumn) -> bool {
        self.selected_column
            .as_ref()
            .is_some_and(|selected| selected.start == column.start)
    }

    /// Drills into `column`, or clears the drill filter when it is already selected.
    ///
    /// Returns the new selection.
    pub fn toggle_column(&mut self, column: &DateColumn) -> Option<&DateColumn> {
        if self.is_column_selected(column) {
            self.selected_column = None;
        } else {
            self.selected_column = Some(column.clone());
        }
        self.selected_column.as_ref()
    }

    /// Returns `true` when the selection changed.
    pub fn select_column(&mut self, column: Option<&DateColumn>) -> bool {
        let next = column.cloned();
        if self.selected_column == next {
            return false;
        }
        self.selected_column = next;
        true
    }

    /// Moves the drilled column by `delta`, clamped to the first/last column.
    ///
    /// Without a current selection any move selects the first column. Empty
    /// `columns` leave the selection untouched.
    pub fn navigate_columns(&mut self, delta: isize, columns: &[DateColumn]) -> bool {
        if columns.is_empty() {
            return false;
        }
        let current = self
            .selected_column
            .as_ref()
            .and_then(|selected| columns.iter().position(|c| c.start == selected.start));
        let target = match current {
            None => 0,
            Some(index) => index.saturating_add_signed(delta).min(columns.len() - 1),
        };
        self.select_column(columns.get(target))
    }

    /// Moves focus by `delta` through the visible orders, wrapping at both ends.
    ///
    /// Without a current focus `+n` starts from the first order and `-n` from
    /// the last. Returns the newly focused id.
    pub fn navigate_orders(
        &mut self,
        delta: isize,
        snapshot: &GridLayoutSnapshot,
    ) -> Option<&WorkOrderId> {
        let flat: Vec<&WorkOrder> = snapshot.flat_orders().collect();
        if flat.is_empty() || delta == 0 {
            return self.focused_order.as_ref();
        }
        let len = flat.len() as isize;
        let current = self
            .focused_order
            .as_ref()
            .and_then(|id| flat.iter().position(|order| &order.id == id));
        let target = match current {
            Some(index) => (index as isize + delta).rem_euclid(len),
            None if delta > 0 => (delta - 1).rem_euclid(len),
            None => (len + delta).rem_euclid(len),
        };
        self.focused_order = Some(flat[target as usize].id.clone());
        self.focused_order.as_ref()
    }

    /// Focuses the first visible order when nothing is focused yet.
    pub fn focus_first_if_none(&mut self, snapshot: &GridLayoutSnapshot) -> bool {
        if self.focused_order.is_some() {
            return false;
        }
        match snapshot.flat_orders().next() {
            Some(first) => {
                self.focused_order = Some(first.id.clone());
                true
            }
            None => false,
        }
    }

    pub fn focus_order(&mut self, id: Option<WorkOrderId>) -> bool {
        if self.focused_order == id {
            return false;
        }
        self.focused_order = id;
        true
    }

    /// Looks up the focused order among the visible ones.
    #[must_use]
    pub fn focused_order<'s>(&self, snapshot: &'s GridLayoutSnapshot) -> Option<&'s WorkOrder> {
        self.focused_order
            .as_ref()
            .and_then(|id| snapshot.find_order(id))
    }

    /// Opens the menu of `id`, or closes it if that menu is already open.
    /// At most one menu is open at any time.
    pub fn toggle_menu(&mut self, id: &WorkOrderId) -> Option<&WorkOrderId> {
        if self.is_menu_open(id) {
            self.open_menu = None;
        } else {
            self.open_menu = Some(id.clone());
        }
        self.open_menu.as_ref()
    }

    pub fn close_menu(&mut self) -> bool {
        self.open_menu.take().is_some()
    }

    /// Clears focus, drill filter and open menu. Returns `true` if anything was set.
    pub fn escape(&mut self) -> bool {
        let changed = self.selected_column.is_some()
            || self.focused_order.is_some()
            || self.open_menu.is_some();
        self.selected_column = None;
        self.focused_order = None;
        self.open_menu = None;
        changed
    }

    /// Drops references to orders that no longer exist.
    pub fn retain_orders(&mut self, orders: &[WorkOrder]) -> bool {
        let exists = |id: &WorkOrderId| orders.iter().any(|order| &order.id == id);
        let mut changed = false;
        if self.focused_order.as_ref().is_some_and(|id| !exists(id)) {
            self.focused_order = None;
            changed = true;
        }
        if self.open_menu.as_ref().is_some_and(|id| !exists(id)) {
            self.open_menu = None;
            changed = true;
        }
        changed
    }
}
