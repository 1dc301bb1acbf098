//! Guardian-facing medication request lifecycle.
//!
//! Owns the request list cache and the request state machine: drafts are
//! validated before anything touches the network, only PENDING requests
//! may be edited or deleted, and deletion is optimistic with rollback.
//! Schedule times cross the wire through `schedule_times` — this module
//! encodes on the way out and decodes on the way in, and nothing outside
//! the codec ever sees the marker.

use chrono::Local;
use uuid::Uuid;

use crate::api::types::{MedicationItemDto, MedicationRequestBody, MedicationRequestDto};
use crate::api::PortalApi;
use crate::dose_gate;
use crate::error::{PortalError, ValidationIssue};
use crate::models::{MedicationItem, MedicationRequest, RequestDraft};
use crate::optimistic;
use crate::schedule_times;
use crate::session::Session;
use std::sync::Arc;

/// Orchestrates guardian CRUD against the portal, holding the loaded
/// request list between calls.
pub struct RequestLifecycleManager<A: PortalApi> {
    api: A,
    session: Arc<Session>,
    requests: Vec<MedicationRequest>,
}

impl<A: PortalApi> RequestLifecycleManager<A> {
    pub fn new(api: A, session: Arc<Session>) -> Self {
        Self {
            api,
            session,
            requests: Vec::new(),
        }
    }

    /// The loaded request list, newest server order preserved.
    pub fn requests(&self) -> &[MedicationRequest] {
        &self.requests
    }

    /// Reload the full list from the portal. This is also the
    /// reconciliation path after racing mutations: the server's view
    /// replaces whatever optimistic state was left behind.
    pub async fn refresh(&mut self) -> Result<(), PortalError> {
        let dtos = self
            .api
            .list_requests(&self.session)
            .await
            .map_err(|e| self.surface(e))?;
        self.requests = dtos.into_iter().map(request_from_dto).collect();
        tracing::debug!(count = self.requests.len(), "request list reloaded");
        Ok(())
    }

    /// Validate and submit a new request. Validation failures carry the
    /// offending field per item and never reach the network.
    pub async fn create(&mut self, draft: &RequestDraft) -> Result<MedicationRequest, PortalError> {
        let body = validated_body(draft)?;
        tracing::info!(student = %body.student_id, items = body.item_requests.len(),
            "submitting medication request");
        let dto = self
            .api
            .create_request(&self.session, &body)
            .await
            .map_err(|e| self.surface(e))?;
        let request = request_from_dto(dto);
        self.requests.push(request.clone());
        Ok(request)
    }

    /// Validate and submit an edit. The locally known status must be
    /// PENDING; if the server's view disagrees with a stale cache, its
    /// 400 comes back as the same `InvalidState` kind.
    pub async fn update(
        &mut self,
        request_id: Uuid,
        draft: &RequestDraft,
    ) -> Result<MedicationRequest, PortalError> {
        if let Some(cached) = self.requests.iter().find(|r| r.id == request_id) {
            if !cached.status.is_mutable() {
                return Err(PortalError::InvalidState(format!(
                    "request {request_id} is {}, only PENDING requests can be edited",
                    cached.status.as_str()
                )));
            }
        }
        let body = validated_body(draft)?;
        let dto = self
            .api
            .update_request(&self.session, request_id, &body)
            .await
            .map_err(|e| self.surface(e))?;
        let request = request_from_dto(dto);
        if let Some(slot) = self.requests.iter_mut().find(|r| r.id == request_id) {
            *slot = request.clone();
        }
        Ok(request)
    }

    /// Delete a PENDING request. The entry leaves the local list
    /// immediately and returns to its original position if the portal
    /// rejects the delete.
    pub async fn delete(&mut self, request_id: Uuid) -> Result<(), PortalError> {
        let Some(position) = self.requests.iter().position(|r| r.id == request_id) else {
            return Err(PortalError::NotFound(format!(
                "request {request_id} is not in the loaded list"
            )));
        };
        if !self.requests[position].status.is_mutable() {
            return Err(PortalError::InvalidState(format!(
                "request {request_id} is {}, only PENDING requests can be deleted",
                self.requests[position].status.as_str()
            )));
        }

        let result = optimistic::mutate(
            &mut self.requests,
            |requests| {
                requests.remove(position);
            },
            self.api.delete_request(&self.session, request_id),
        )
        .await;
        result.map_err(|e| self.surface(e))
    }

    /// Fetch one request with items fully decoded for display. Schedule
    /// times come from the structured field when the portal sent one,
    /// else from the note payload, else evenly-spaced defaults.
    pub async fn load_detail(&mut self, request_id: Uuid) -> Result<MedicationRequest, PortalError> {
        let dto = self
            .api
            .get_request(&self.session, request_id)
            .await
            .map_err(|e| self.surface(e))?;
        let request = request_from_dto(dto);
        if let Some(slot) = self.requests.iter_mut().find(|r| r.id == request_id) {
            *slot = request.clone();
        }
        Ok(request)
    }

    fn surface(&self, err: PortalError) -> PortalError {
        self.session.expire_from(&err);
        err
    }
}

// ──────────────────────────────────────────────
// Draft validation
// ──────────────────────────────────────────────

/// Check everything the portal would reject anyway, before calling it,
/// and assemble the wire body. Times are encoded into each item's note
/// here, at the one boundary allowed to use the codec.
fn validated_body(draft: &RequestDraft) -> Result<MedicationRequestBody, PortalError> {
    let mut issues = Vec::new();
    let today = Local::now().date_naive();

    if draft.student_id.is_none() {
        issues.push(ValidationIssue::request("studentId", "a student must be selected"));
    }
    match (draft.start_date, draft.end_date) {
        (Some(start), Some(end)) => {
            if start < today {
                issues.push(ValidationIssue::request(
                    "startDate",
                    "start date must not be in the past",
                ));
            }
            if end < start {
                issues.push(ValidationIssue::request(
                    "endDate",
                    "end date must not be before the start date",
                ));
            }
        }
        (start, end) => {
            if start.is_none() {
                issues.push(ValidationIssue::request("startDate", "a start date is required"));
            }
            if end.is_none() {
                issues.push(ValidationIssue::request("endDate", "an end date is required"));
            }
        }
    }

    if draft.items.is_empty() {
        issues.push(ValidationIssue::request(
            "items",
            "at least one medication item is required",
        ));
    }

    for (index, item) in draft.items.iter().enumerate() {
        let name = item.item_name.trim();
        if name.is_empty() {
            issues.push(ValidationIssue::item(
                index,
                name,
                "itemName",
                "medication name must not be empty",
            ));
        }
        if item.dosage <= 0.0 {
            issues.push(ValidationIssue::item(
                index,
                name,
                "dosage",
                "dosage must be positive",
            ));
        }
        if item.frequency == 0 {
            issues.push(ValidationIssue::item(
                index,
                name,
                "frequency",
                "frequency must be at least one dose per day",
            ));
        }
        if item.schedule_times.len() != item.frequency as usize {
            issues.push(ValidationIssue::item(
                index,
                name,
                "scheduleTimes",
                format!(
                    "expected {} administration times, got {}",
                    item.frequency,
                    item.schedule_times.len()
                ),
            ));
        }
        for (slot, time) in item.schedule_times.iter().enumerate() {
            if dose_gate::parse_hhmm(time).is_none() {
                issues.push(ValidationIssue::item(
                    index,
                    name,
                    &format!("scheduleTimes[{slot}]"),
                    format!("'{time}' is not a valid HH:mm time"),
                ));
            }
        }
    }

    if !issues.is_empty() {
        return Err(PortalError::Validation(issues));
    }

    // All required fields were just checked; missing ones produced issues.
    let (Some(student_id), Some(start_date), Some(end_date)) =
        (draft.student_id, draft.start_date, draft.end_date)
    else {
        return Err(PortalError::Validation(issues));
    };

    Ok(MedicationRequestBody {
        student_id,
        start_date,
        end_date,
        general_note: draft
            .general_note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
        item_requests: draft
            .items
            .iter()
            .map(|item| MedicationItemDto {
                item_id: item.item_id,
                item_name: item.item_name.trim().to_string(),
                purpose: item.purpose.clone(),
                item_type: item.item_type,
                dosage: item.dosage,
                frequency: item.frequency,
                note: Some(schedule_times::encode(
                    item.note.as_deref(),
                    &item.schedule_times,
                )),
                schedule_times: None,
            })
            .collect(),
    })
}

// ──────────────────────────────────────────────
// Wire → domain mapping
// ──────────────────────────────────────────────

fn request_from_dto(dto: MedicationRequestDto) -> MedicationRequest {
    MedicationRequest {
        id: dto.id,
        student_id: dto.student_id,
        request_date: dto.request_date,
        start_date: dto.start_date,
        end_date: dto.end_date,
        general_note: dto.general_note,
        status: dto.status,
        items: dto.item_requests.into_iter().map(item_from_dto).collect(),
    }
}

fn item_from_dto(dto: MedicationItemDto) -> MedicationItem {
    let decoded = schedule_times::decode(dto.note.as_deref());

    // Structured field first, then the note payload, then the display
    // fallback when the frequency is known.
    let times = match dto.schedule_times {
        Some(structured) if !structured.is_empty() => structured,
        _ if !decoded.schedule_times.is_empty() => decoded.schedule_times,
        _ if dto.frequency > 0 => schedule_times::default_times(dto.frequency),
        _ => Vec::new(),
    };

    MedicationItem {
        id: dto.item_id,
        item_name: dto.item_name,
        purpose: dto.purpose,
        item_type: dto.item_type,
        dosage: dto.dosage,
        frequency: dto.frequency,
        note: if decoded.human_note.is_empty() {
            None
        } else {
            Some(decoded.human_note)
        },
        schedule_times: times,
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
