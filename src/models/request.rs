use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{ItemType, RequestStatus};

/// A guardian's medication request for one student over a date range.
///
/// Owned items are always present (a request without items is invalid
/// and rejected before it ever reaches the portal). `request_date` is
/// server-assigned; it is `None` only on drafts that never round-tripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRequest {
    pub id: Uuid,
    pub student_id: Uuid,
    pub request_date: Option<NaiveDate>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub general_note: Option<String>,
    pub status: RequestStatus,
    pub items: Vec<MedicationItem>,
}

/// One medication within a request. `id` is `None` for an item composed
/// in an edit session that the portal has not persisted yet — absence,
/// not a nil UUID, is the "new item" signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationItem {
    pub id: Option<Uuid>,
    pub item_name: String,
    pub purpose: String,
    pub item_type: ItemType,
    pub dosage: f64,
    /// Doses per day. `schedule_times.len()` must equal this.
    pub frequency: u32,
    /// Human-authored note, already stripped of the schedule-time payload.
    pub note: Option<String>,
    /// Daily administration times, `HH:mm`, one per dose.
    pub schedule_times: Vec<String>,
}

/// Guardian input for `create`/`update`, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDraft {
    pub student_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub general_note: Option<String>,
    pub items: Vec<ItemDraft>,
}

/// One item as composed in the request form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    /// Carried over when editing a persisted item; `None` means new.
    pub item_id: Option<Uuid>,
    pub item_name: String,
    pub purpose: String,
    pub item_type: ItemType,
    pub dosage: f64,
    pub frequency: u32,
    pub note: Option<String>,
    pub schedule_times: Vec<String>,
}
