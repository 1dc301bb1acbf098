pub mod enums;
pub mod filters;
pub mod request;
pub mod schedule;

pub use enums::{DoseStatus, ItemType, RequestStatus, UnknownEnumValue};
pub use filters::ScheduleFilter;
pub use request::{ItemDraft, MedicationItem, MedicationRequest, RequestDraft};
pub use schedule::DoseSchedule;
