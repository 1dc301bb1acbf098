use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::DoseStatus;

/// One calendar-day occurrence of one item's daily dose.
///
/// Rows are materialized by the portal when a request is approved (one
/// per item × schedule time × day of the date range). The engine reads
/// and mutates them; it never creates or deletes them. Wire shape and
/// domain shape coincide, so this struct serializes directly.
///
/// `scheduled_time` stays in the portal's `HH:mm` spelling; it is parsed
/// at the gate, the one place that interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseSchedule {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub class_name: String,
    pub medication_name: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: String,
    pub status: DoseStatus,
    /// Nurse's administration note, independent of the request-level note.
    pub nurse_note: Option<String>,
}
