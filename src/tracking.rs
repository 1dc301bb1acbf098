//! Nurse- and parent-facing dose schedule tracking.
//!
//! Lists materialized dose rows under exactly one filter axis (a day for
//! the nurse rounds view, a student for the parent view), and mutates
//! row status/notes behind the time gate. Recording an outcome before
//! its scheduled instant is refused locally; everything that does go out
//! is an optimistic mutation that rolls back on rejection.

use chrono::Local;
use uuid::Uuid;

use crate::api::PortalApi;
use crate::dose_gate;
use crate::error::PortalError;
use crate::models::{DoseSchedule, DoseStatus, ScheduleFilter};
use crate::optimistic;
use crate::session::Session;
use std::sync::Arc;

/// Local transition table. TAKEN and MISSED never convert into each
/// other directly; corrections go through a reset to PENDING first.
fn transition_allowed(from: DoseStatus, to: DoseStatus) -> bool {
    match (from, to) {
        (DoseStatus::Pending, to) if to.is_terminal() => true,
        (from, DoseStatus::Pending) if from.is_terminal() => true,
        _ => false,
    }
}

/// Holds the currently loaded dose rows and their filter.
pub struct DoseScheduleTracker<A: PortalApi> {
    api: A,
    session: Arc<Session>,
    filter: Option<ScheduleFilter>,
    rows: Vec<DoseSchedule>,
}

impl<A: PortalApi> DoseScheduleTracker<A> {
    pub fn new(api: A, session: Arc<Session>) -> Self {
        Self {
            api,
            session,
            filter: None,
            rows: Vec::new(),
        }
    }

    /// The loaded rows for the active filter.
    pub fn rows(&self) -> &[DoseSchedule] {
        &self.rows
    }

    /// The active filter, if any view has been loaded.
    pub fn filter(&self) -> Option<&ScheduleFilter> {
        self.filter.as_ref()
    }

    /// Load the nurse rounds view: one day, optionally one status.
    /// Replaces any student filter — the two axes never combine.
    pub async fn load_by_date(
        &mut self,
        date: chrono::NaiveDate,
        status: Option<DoseStatus>,
    ) -> Result<&[DoseSchedule], PortalError> {
        let rows = self
            .api
            .schedules_by_date(&self.session, date, status)
            .await
            .map_err(|e| self.surface(e))?;
        self.filter = Some(ScheduleFilter::ByDate { date, status });
        self.rows = rows;
        tracing::debug!(count = self.rows.len(), %date, "dose schedules loaded by date");
        Ok(&self.rows)
    }

    /// Load the per-student view. Replaces any date filter.
    pub async fn load_by_student(
        &mut self,
        student_id: Uuid,
    ) -> Result<&[DoseSchedule], PortalError> {
        let rows = self
            .api
            .schedules_by_student(&self.session, student_id)
            .await
            .map_err(|e| self.surface(e))?;
        self.filter = Some(ScheduleFilter::ByStudent { student_id });
        self.rows = rows;
        tracing::debug!(count = self.rows.len(), %student_id, "dose schedules loaded by student");
        Ok(&self.rows)
    }

    /// Refetch the active filter. This is the reconciliation path for
    /// anything optimistic mutations left behind; without a filter it is
    /// a no-op.
    pub async fn refresh(&mut self) -> Result<(), PortalError> {
        match self.filter.clone() {
            Some(ScheduleFilter::ByDate { date, status }) => {
                self.load_by_date(date, status).await?;
            }
            Some(ScheduleFilter::ByStudent { student_id }) => {
                self.load_by_student(student_id).await?;
            }
            None => {}
        }
        Ok(())
    }

    /// Record a dose outcome (or reset one). Transition legality and the
    /// time gate are both checked before any network traffic; a gate
    /// refusal carries the remaining wait for display.
    pub async fn update_status(
        &mut self,
        schedule_id: Uuid,
        new_status: DoseStatus,
    ) -> Result<(), PortalError> {
        let position = self.gated_position(schedule_id)?;
        let current = self.rows[position].status;
        if !transition_allowed(current, new_status) {
            return Err(PortalError::InvalidState(format!(
                "dose cannot go {} -> {}; reset it to PENDING first",
                current.as_str(),
                new_status.as_str()
            )));
        }

        tracing::info!(%schedule_id, from = current.as_str(), to = new_status.as_str(),
            "recording dose status");
        let result = optimistic::mutate(
            &mut self.rows,
            |rows| rows[position].status = new_status,
            self.api
                .update_schedule_status(&self.session, schedule_id, new_status, None),
        )
        .await;
        result.map_err(|e| self.surface(e))
    }

    /// Clear a recorded outcome back to PENDING (the first half of the
    /// two-step correction path).
    pub async fn reset(&mut self, schedule_id: Uuid) -> Result<(), PortalError> {
        self.update_status(schedule_id, DoseStatus::Pending).await
    }

    /// Update the nurse's administration note for one dose row.
    pub async fn update_note(
        &mut self,
        schedule_id: Uuid,
        note: &str,
    ) -> Result<(), PortalError> {
        let position = self.gated_position(schedule_id)?;

        let new_note = note.to_string();
        let result = optimistic::mutate(
            &mut self.rows,
            |rows| rows[position].nurse_note = Some(new_note),
            self.api
                .update_schedule_note(&self.session, schedule_id, note),
        )
        .await;
        result.map_err(|e| self.surface(e))
    }

    /// Locate a row and run the time gate against the local clock.
    fn gated_position(&self, schedule_id: Uuid) -> Result<usize, PortalError> {
        let Some(position) = self.rows.iter().position(|r| r.id == schedule_id) else {
            return Err(PortalError::NotFound(format!(
                "dose schedule {schedule_id} is not in the loaded view"
            )));
        };

        let row = &self.rows[position];
        let now = Local::now().naive_local();
        if !dose_gate::can_mutate(row.scheduled_date, &row.scheduled_time, now) {
            let remaining =
                dose_gate::time_until_mutable(row.scheduled_date, &row.scheduled_time, now)
                    .unwrap_or_else(chrono::Duration::zero);
            return Err(PortalError::NotYetDue { remaining });
        }
        Ok(position)
    }

    fn surface(&self, err: PortalError) -> PortalError {
        self.session.expire_from(&err);
        err
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
