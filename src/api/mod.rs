mod engine;
mod engine_config;
mod frame_builder;
mod invalidation;
mod json_contract;
mod layout_cache;
mod navigation_target_resolver;
mod repository;
mod selection;

pub use engine::TimelineEngine;
pub use engine_config::TimelineEngineConfig;
pub use frame_builder::{FrameBadge, FrameBar, FrameColumn, FrameLane, TimelineFrame};
pub use invalidation::{InvalidationLevel, InvalidationMask, InvalidationTopic, InvalidationTopics};
pub use json_contract::{
    Document, TIMELINE_DATASET_JSON_SCHEMA_V1, TimelineDataset, TimelineDatasetJsonContractV1,
    WorkCenterDocument, WorkCenterDocumentData, WorkOrderDocument, WorkOrderDocumentData,
};
pub use layout_cache::{
    GridLayoutCache, GridLayoutSnapshot, LayoutCacheKey, LayoutCacheStats, LayoutInputs,
    order_intersects_window, visibility_window,
};
pub use navigation_target_resolver::{
    clamp_scroll_offset, scroll_offset_for_date, scroll_offset_to_reveal, selected_column_center,
    today_indicator_offset,
};
pub use repository::{InMemoryWorkOrderRepository, WorkOrderRepository};
pub use selection::TimelineSelection;
