pub mod coordinate;
pub mod grid;
pub mod overlap;
pub mod primitives;
pub mod types;
pub mod zoom;

pub use coordinate::{
    BarGeometry, column_index_at, column_index_for_date, date_from_position, date_position,
    order_geometry, order_left_position, order_width_px,
};
pub use grid::{DateColumn, TimelineGrid};
pub use overlap::{find_conflicts, overlaps, overlaps_between};
pub use types::{WorkCenter, WorkCenterId, WorkOrder, WorkOrderId, WorkOrderStatus, ZoomLevel};
pub use zoom::{
    ZoomMetrics, ZoomScaleTable, date_offset, date_range_width, datetime_offset,
    generate_columns, generate_columns_between,
};
