//! reqwest implementation of `PortalApi`.

use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::types::{
    MedicationRequestBody, MedicationRequestDto, ScheduleNotePayload, ScheduleStatusPayload,
};
use super::PortalApi;
use crate::config;
use crate::error::PortalError;
use crate::models::{DoseSchedule, DoseStatus};
use crate::session::Session;

/// HTTP client for the school-health portal backend.
pub struct HttpPortalApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPortalApi {
    /// Create a client against the given base URL.
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config::http_timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Client for the configured portal (`MEDROUNDS_API_URL` or the
    /// development default).
    pub fn from_env() -> Self {
        Self::new(&config::api_base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(&self, err: reqwest::Error) -> PortalError {
        if err.is_connect() {
            PortalError::Transport(format!("cannot reach portal at {}", self.base_url))
        } else if err.is_timeout() {
            PortalError::Transport(format!(
                "request timed out after {}s",
                config::http_timeout().as_secs()
            ))
        } else {
            PortalError::Transport(err.to_string())
        }
    }

    /// Map a non-2xx response to the engine's error taxonomy and decode
    /// 2xx bodies as JSON.
    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, PortalError> {
        let response = self.check(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| PortalError::Transport(format!("invalid response body: {e}")))
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, PortalError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_status(status, &body))
    }
}

/// 401/403/404/400 become typed kinds; everything else is transport.
fn map_status(status: StatusCode, body: &str) -> PortalError {
    match status.as_u16() {
        401 => PortalError::SessionExpired,
        403 => PortalError::Forbidden(server_message(body, "access denied")),
        404 => PortalError::NotFound(server_message(body, "resource not found")),
        400 => PortalError::InvalidState(server_message(body, "request rejected by the portal")),
        _ => PortalError::Transport(format!(
            "unexpected status {}: {}",
            status.as_u16(),
            server_message(body, "no detail")
        )),
    }
}

/// Pull a human-readable message out of an error body. The portal sends
/// `{"message": "..."}`; anything else falls back to the raw text.
fn server_message(body: &str, fallback: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

impl PortalApi for HttpPortalApi {
    async fn list_requests(
        &self,
        session: &Session,
    ) -> Result<Vec<MedicationRequestDto>, PortalError> {
        let url = format!("{}/medication-requests", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(session.token())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.decode(response).await
    }

    async fn get_request(
        &self,
        session: &Session,
        id: Uuid,
    ) -> Result<MedicationRequestDto, PortalError> {
        let url = format!("{}/medication-requests/{id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(session.token())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.decode(response).await
    }

    async fn create_request(
        &self,
        session: &Session,
        body: &MedicationRequestBody,
    ) -> Result<MedicationRequestDto, PortalError> {
        let url = format!("{}/medication-requests", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(session.token())
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.decode(response).await
    }

    async fn update_request(
        &self,
        session: &Session,
        id: Uuid,
        body: &MedicationRequestBody,
    ) -> Result<MedicationRequestDto, PortalError> {
        let url = format!("{}/medication-requests/{id}", self.base_url);
        let response = self
            .client
            .put(&url)
            .bearer_auth(session.token())
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.decode(response).await
    }

    async fn delete_request(&self, session: &Session, id: Uuid) -> Result<(), PortalError> {
        let url = format!("{}/medication-requests/{id}", self.base_url);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(session.token())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.check(response).await.map(|_| ())
    }

    async fn schedules_by_date(
        &self,
        session: &Session,
        date: NaiveDate,
        status: Option<DoseStatus>,
    ) -> Result<Vec<DoseSchedule>, PortalError> {
        let url = format!("{}/medications/schedules", self.base_url);
        let mut query: Vec<(&str, String)> = vec![("date", date.format("%Y-%m-%d").to_string())];
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        let response = self
            .client
            .get(&url)
            .query(&query)
            .bearer_auth(session.token())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.decode(response).await
    }

    async fn schedules_by_student(
        &self,
        session: &Session,
        student_id: Uuid,
    ) -> Result<Vec<DoseSchedule>, PortalError> {
        let url = format!("{}/medications/schedules/student/{student_id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(session.token())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.decode(response).await
    }

    async fn update_schedule_status(
        &self,
        session: &Session,
        id: Uuid,
        status: DoseStatus,
        note: Option<&str>,
    ) -> Result<(), PortalError> {
        let url = format!("{}/medications/schedules/{id}/status", self.base_url);
        let payload = ScheduleStatusPayload {
            status,
            note: note.map(str::to_string),
        };
        let response = self
            .client
            .put(&url)
            .bearer_auth(session.token())
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.check(response).await.map(|_| ())
    }

    async fn update_schedule_note(
        &self,
        session: &Session,
        id: Uuid,
        note: &str,
    ) -> Result<(), PortalError> {
        let url = format!("{}/medications/schedules/{id}/note", self.base_url);
        let payload = ScheduleNotePayload {
            note: note.to_string(),
        };
        let response = self
            .client
            .put(&url)
            .bearer_auth(session.token())
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.check(response).await.map(|_| ())
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let api = HttpPortalApi::new("https://portal.example.org/api/v1/");
        assert_eq!(api.base_url(), "https://portal.example.org/api/v1");
    }

    #[test]
    fn status_mapping_matches_taxonomy() {
        assert_eq!(
            map_status(StatusCode::UNAUTHORIZED, ""),
            PortalError::SessionExpired
        );
        assert!(matches!(
            map_status(StatusCode::FORBIDDEN, ""),
            PortalError::Forbidden(_)
        ));
        assert!(matches!(
            map_status(StatusCode::NOT_FOUND, ""),
            PortalError::NotFound(_)
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_REQUEST, ""),
            PortalError::InvalidState(_)
        ));
        assert!(matches!(
            map_status(StatusCode::INTERNAL_SERVER_ERROR, ""),
            PortalError::Transport(_)
        ));
    }

    #[test]
    fn server_message_prefers_json_message_field() {
        let body = r#"{"message": "request is not editable"}"#;
        assert_eq!(server_message(body, "x"), "request is not editable");
        assert_eq!(server_message("plain text", "x"), "plain text");
        assert_eq!(server_message("   ", "fallback"), "fallback");
    }

    #[test]
    fn bad_request_carries_server_text() {
        let err = map_status(
            StatusCode::BAD_REQUEST,
            r#"{"message": "status is APPROVED"}"#,
        );
        assert_eq!(err, PortalError::InvalidState("status is APPROVED".into()));
    }
}
