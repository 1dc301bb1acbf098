//! Wire types for the portal's medication endpoints.
//!
//! These mirror the backend's JSON shapes verbatim (camelCase keys,
//! SCREAMING enum values, ISO dates). The item `note` field doubles as
//! the schedule-time transport — see `schedule_times` — and responses
//! sometimes carry a structured `scheduleTimes` sibling that takes
//! precedence over the note payload when present.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{DoseStatus, ItemType, RequestStatus};

/// A medication request as the portal returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRequestDto {
    pub id: Uuid,
    pub student_id: Uuid,
    #[serde(default)]
    pub request_date: Option<NaiveDate>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub general_note: Option<String>,
    pub status: RequestStatus,
    #[serde(default)]
    pub item_requests: Vec<MedicationItemDto>,
}

/// One item on the wire, request and response alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationItemDto {
    /// Present for persisted items; omitted entirely for new ones so the
    /// portal can tell in-place edits from additions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<Uuid>,
    pub item_name: String,
    pub purpose: String,
    pub item_type: ItemType,
    pub dosage: f64,
    pub frequency: u32,
    /// Free-text note; carries the encoded schedule times (the record
    /// has no structured column for them).
    #[serde(default)]
    pub note: Option<String>,
    /// Structured sibling some endpoints return; wins over the note
    /// payload when present. Never written by this client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_times: Option<Vec<String>>,
}

/// Body for `POST /medication-requests` and `PUT /medication-requests/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRequestBody {
    pub student_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_note: Option<String>,
    pub item_requests: Vec<MedicationItemDto>,
}

/// Body for `PUT /medications/schedules/{id}/status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStatusPayload {
    pub status: DoseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Body for `PUT /medications/schedules/{id}/note`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleNotePayload {
    pub note: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_items_omit_item_id_on_the_wire() {
        let dto = MedicationItemDto {
            item_id: None,
            item_name: "Cetirizine".into(),
            purpose: "allergy".into(),
            item_type: ItemType::Tablet,
            dosage: 10.0,
            frequency: 1,
            note: None,
            schedule_times: None,
        };
        let json = serde_json::to_string(&dto).unwrap();
        assert!(!json.contains("itemId"));
        assert!(!json.contains("scheduleTimes"));
        assert!(json.contains("\"itemType\":\"TABLET\""));
    }

    #[test]
    fn response_with_structured_times_deserializes() {
        let json = r#"{
            "itemId": "7f8e4c8a-8f5e-4f6d-9b6a-2f1f6a7f0a01",
            "itemName": "Amoxicillin",
            "purpose": "infection",
            "itemType": "LIQUID",
            "dosage": 5.0,
            "frequency": 2,
            "note": "shake well",
            "scheduleTimes": ["08:00", "20:00"]
        }"#;
        let dto: MedicationItemDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.schedule_times.as_deref().unwrap().len(), 2);
        assert_eq!(dto.note.as_deref(), Some("shake well"));
    }

    #[test]
    fn request_dto_tolerates_missing_optionals() {
        let json = r#"{
            "id": "0a6e4c8a-8f5e-4f6d-9b6a-2f1f6a7f0a01",
            "studentId": "1b6e4c8a-8f5e-4f6d-9b6a-2f1f6a7f0a02",
            "startDate": "2026-03-02",
            "endDate": "2026-03-06",
            "status": "PENDING"
        }"#;
        let dto: MedicationRequestDto = serde_json::from_str(json).unwrap();
        assert!(dto.request_date.is_none());
        assert!(dto.item_requests.is_empty());
    }
}
