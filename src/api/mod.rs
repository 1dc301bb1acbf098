//! Portal HTTP surface.
//!
//! `PortalApi` is the engine's only network seam: the request manager
//! and the dose tracker are generic over it, the production
//! implementation is `HttpPortalApi` (reqwest), and tests substitute
//! recording mocks. Every call takes the injected `Session` so the
//! bearer token never lives in module state.

pub mod client;
pub mod types;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::PortalError;
use crate::models::{DoseSchedule, DoseStatus};
use crate::session::Session;
use types::{MedicationRequestBody, MedicationRequestDto};

pub use client::HttpPortalApi;

/// The portal endpoints the engine consumes. Only the request/response
/// contracts matter here; everything else about the backend is opaque.
#[allow(async_fn_in_trait)]
pub trait PortalApi {
    // ── Guardian-facing request CRUD ────────────────────────

    async fn list_requests(
        &self,
        session: &Session,
    ) -> Result<Vec<MedicationRequestDto>, PortalError>;

    async fn get_request(
        &self,
        session: &Session,
        id: Uuid,
    ) -> Result<MedicationRequestDto, PortalError>;

    async fn create_request(
        &self,
        session: &Session,
        body: &MedicationRequestBody,
    ) -> Result<MedicationRequestDto, PortalError>;

    async fn update_request(
        &self,
        session: &Session,
        id: Uuid,
        body: &MedicationRequestBody,
    ) -> Result<MedicationRequestDto, PortalError>;

    async fn delete_request(&self, session: &Session, id: Uuid) -> Result<(), PortalError>;

    // ── Nurse-facing dose tracking ──────────────────────────

    async fn schedules_by_date(
        &self,
        session: &Session,
        date: NaiveDate,
        status: Option<DoseStatus>,
    ) -> Result<Vec<DoseSchedule>, PortalError>;

    async fn schedules_by_student(
        &self,
        session: &Session,
        student_id: Uuid,
    ) -> Result<Vec<DoseSchedule>, PortalError>;

    async fn update_schedule_status(
        &self,
        session: &Session,
        id: Uuid,
        status: DoseStatus,
        note: Option<&str>,
    ) -> Result<(), PortalError>;

    async fn update_schedule_note(
        &self,
        session: &Session,
        id: Uuid,
        note: &str,
    ) -> Result<(), PortalError>;
}
