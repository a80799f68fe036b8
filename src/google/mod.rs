//! Minimal Google Calendar v3 client: one insert-event call.

pub mod types;

use crate::error::{MkMeetError, MkMeetResult};
use crate::event::{EventRequest, EventResult};
use crate::session::Session;
use tracing::debug;
use types::{EventPayload, InsertedEvent};

const API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google's alias for the user's main calendar
pub const DEFAULT_CALENDAR_ID: &str = "primary";

pub struct CalendarClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl CalendarClient {
    pub fn new(session: &Session) -> Self {
        Self::with_base_url(session, API_BASE)
    }

    pub fn with_base_url(session: &Session, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            access_token: session.access_token.clone(),
        }
    }

    /// Insert one event with conference-data support enabled.
    pub async fn insert_event(
        &self,
        calendar_id: &str,
        payload: &EventPayload,
    ) -> MkMeetResult<InsertedEvent> {
        let url = format!("{}/calendars/{}/events", self.base_url, calendar_id);

        debug!(calendar_id, "inserting calendar event");

        let response = self
            .http
            .post(&url)
            .query(&[("conferenceDataVersion", "1")])
            .bearer_auth(&self.access_token)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "could not read error response".to_string());
            return Err(MkMeetError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<InsertedEvent>()
            .await
            .map_err(|e| MkMeetError::MalformedResponse(format!("created-event response: {e}")))
    }
}

/// Create the event and report the shareable links.
pub async fn submit(session: &Session, request: &EventRequest) -> MkMeetResult<EventResult> {
    let client = CalendarClient::new(session);
    submit_with(&client, request).await
}

pub async fn submit_with(
    client: &CalendarClient,
    request: &EventRequest,
) -> MkMeetResult<EventResult> {
    // The provider dedups conference creation by request id, so every
    // submission gets a fresh one.
    let request_id = uuid::Uuid::new_v4().to_string();
    let payload = request.to_payload(&request_id);

    let created = client.insert_event(DEFAULT_CALENDAR_ID, &payload).await?;

    debug!(event_id = %created.id, "event created");

    let meet_link = if request.with_meet {
        created
            .conference_data
            .as_ref()
            .and_then(|conference| conference.entry_points.first())
            .map(|entry| entry.uri.clone())
            .ok_or_else(|| {
                MkMeetError::MalformedResponse(
                    "created-event response contained no conference entry points".to_string(),
                )
            })?
    } else {
        String::new()
    };

    Ok(EventResult {
        event_link: created.html_link,
        meet_link,
    })
}
