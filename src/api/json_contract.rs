use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{WorkCenter, WorkCenterId, WorkOrder, WorkOrderId, WorkOrderStatus};
use crate::error::{TimelineError, TimelineResult};

pub const TIMELINE_DATASET_JSON_SCHEMA_V1: u32 = 1;

const WORK_CENTER_DOC_TYPE: &str = "workCenter";
const WORK_ORDER_DOC_TYPE: &str = "workOrder";

/// Work-center catalog plus work-order snapshot, as loaded from disk or a host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimelineDataset {
    #[serde(default)]
    pub work_centers: Vec<WorkCenter>,
    #[serde(default)]
    pub work_orders: Vec<WorkOrder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineDatasetJsonContractV1 {
    pub schema_version: u32,
    #[serde(flatten)]
    pub dataset: TimelineDataset,
}

/// `{ docId, docType, data }` envelope used by document stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document<T> {
    pub doc_id: String,
    #[serde(default)]
    pub doc_type: Option<String>,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCenterDocumentData {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderDocumentData {
    #[serde(default)]
    pub name: String,
    pub work_center_id: String,
    #[serde(default)]
    pub status: WorkOrderStatus,
    pub start_date: String,
    pub end_date: String,
}

pub type WorkCenterDocument = Document<WorkCenterDocumentData>;
pub type WorkOrderDocument = Document<WorkOrderDocumentData>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentDataset {
    #[serde(default)]
    work_centers: Vec<WorkCenterDocument>,
    #[serde(default)]
    work_orders: Vec<WorkOrderDocument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatasetShape {
    Versioned,
    Documents,
    OrderDocuments,
    Plain,
}

impl DatasetShape {
    fn detect(value: &Value) -> Self {
        match value {
            Value::Object(map) if map.contains_key("schema_version") => Self::Versioned,
            Value::Object(map)
                if map.contains_key("workCenters") || map.contains_key("workOrders") =>
            {
                Self::Documents
            }
            Value::Array(_) => Self::OrderDocuments,
            _ => Self::Plain,
        }
    }
}

impl TimelineDataset {
    #[must_use]
    pub fn new(work_centers: Vec<WorkCenter>, work_orders: Vec<WorkOrder>) -> Self {
        Self {
            work_centers,
            work_orders,
        }
    }

    pub fn to_json_contract_v1_pretty(&self) -> TimelineResult<String> {
        let payload = TimelineDatasetJsonContractV1 {
            schema_version: TIMELINE_DATASET_JSON_SCHEMA_V1,
            dataset: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            TimelineError::InvalidData(format!("failed to serialize dataset contract v1: {e}"))
        })
    }

    /// Parses any supported dataset shape:
    ///
    /// - the versioned contract (`schema_version` plus snake_case fields),
    /// - a document export `{ "workCenters": [...], "workOrders": [...] }`,
    /// - a bare array of work-order documents,
    /// - an unversioned snake_case dataset.
    ///
    /// Every order is validated after parsing.
    pub fn from_json_compat_str(input: &str) -> TimelineResult<Self> {
        let value: Value = serde_json::from_str(input).map_err(|e| {
            TimelineError::InvalidData(format!("failed to parse dataset json payload: {e}"))
        })?;

        let dataset = match DatasetShape::detect(&value) {
            DatasetShape::Versioned => {
                let payload: TimelineDatasetJsonContractV1 = serde_json::from_value(value)
                    .map_err(|e| {
                        TimelineError::InvalidData(format!("failed to parse dataset contract: {e}"))
                    })?;
                if payload.schema_version != TIMELINE_DATASET_JSON_SCHEMA_V1 {
                    return Err(TimelineError::InvalidData(format!(
                        "unsupported dataset schema version: {}",
                        payload.schema_version
                    )));
                }
                payload.dataset
            }
            DatasetShape::Documents => {
                let documents: DocumentDataset = serde_json::from_value(value).map_err(|e| {
                    TimelineError::InvalidData(format!("failed to parse document dataset: {e}"))
                })?;
                Self::from_documents(documents.work_centers, documents.work_orders)?
            }
            DatasetShape::OrderDocuments => {
                let orders: Vec<WorkOrderDocument> = serde_json::from_value(value).map_err(|e| {
                    TimelineError::InvalidData(format!("failed to parse work-order documents: {e}"))
                })?;
                Self::from_documents(Vec::new(), orders)?
            }
            DatasetShape::Plain => serde_json::from_value(value).map_err(|e| {
                TimelineError::InvalidData(format!("failed to parse dataset: {e}"))
            })?,
        };

        for order in &dataset.work_orders {
            order.validate()?;
        }
        debug!(
            work_centers = dataset.work_centers.len(),
            work_orders = dataset.work_orders.len(),
            "loaded timeline dataset"
        );
        Ok(dataset)
    }

    /// Converts document envelopes, skipping entries whose `docType` names
    /// another collection.
    pub fn from_documents(
        centers: Vec<WorkCenterDocument>,
        orders: Vec<WorkOrderDocument>,
    ) -> TimelineResult<Self> {
        let work_centers = centers
            .into_iter()
            .filter(|doc| has_doc_type(doc, WORK_CENTER_DOC_TYPE))
            .map(|doc| WorkCenter {
                id: WorkCenterId::new(doc.doc_id),
                name: doc.data.name,
            })
            .collect();

        let mut work_orders = Vec::with_capacity(orders.len());
        for doc in orders {
            if !has_doc_type(&doc, WORK_ORDER_DOC_TYPE) {
                continue;
            }
            let start_date = parse_document_date(&doc.doc_id, &doc.data.start_date)?;
            let end_date = parse_document_date(&doc.doc_id, &doc.data.end_date)?;
            work_orders.push(WorkOrder {
                id: WorkOrderId::new(doc.doc_id),
                name: doc.data.name,
                work_center_id: WorkCenterId::new(doc.data.work_center_id),
                status: doc.data.status,
                start_date,
                end_date,
            });
        }

        Ok(Self {
            work_centers,
            work_orders,
        })
    }
}

fn has_doc_type<T>(doc: &Document<T>, expected: &str) -> bool {
    match doc.doc_type.as_deref() {
        None => true,
        Some(doc_type) if doc_type == expected => true,
        Some(doc_type) => {
            warn!(doc_id = %doc.doc_id, doc_type, expected, "skipping document of unexpected type");
            false
        }
    }
}

/// Accepts `YYYY-MM-DD` or an ISO timestamp, keeping only the calendar date.
fn parse_document_date(doc_id: &str, raw: &str) -> TimelineResult<NaiveDate> {
    let date_part = raw.split_once('T').map_or(raw, |(date, _)| date).trim();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
        TimelineError::InvalidData(format!("document `{doc_id}` has invalid date `{raw}`: {e}"))
    })
}
