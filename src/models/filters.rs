use chrono::NaiveDate;
use uuid::Uuid;

use super::enums::DoseStatus;

/// Active filter for the dose-schedule views.
///
/// The nurse view filters by date (optionally narrowed to one status);
/// the per-student view filters by student. The two are mutually
/// exclusive by business rule, so the filter is a tagged union rather
/// than two independently-settable fields: selecting one necessarily
/// discards the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleFilter {
    ByDate {
        date: NaiveDate,
        /// `None` means ALL statuses.
        status: Option<DoseStatus>,
    },
    ByStudent {
        student_id: Uuid,
    },
}
