//! Event details assembled from console input or flags.

use crate::error::{MkMeetError, MkMeetResult};
use crate::google::types::{
    ConferenceData, ConferenceSolutionKey, CreateConferenceRequest, EventAttendee, EventDateTime,
    EventPayload,
};
use chrono::NaiveDateTime;

pub const INPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const TIME_ZONE: &str = "UTC";
const MEET_SOLUTION: &str = "hangoutsMeet";

/// A single event to be created.
#[derive(Debug, Clone)]
pub struct EventRequest {
    pub summary: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub attendees: Vec<String>,
    pub with_meet: bool,
}

impl EventRequest {
    /// Wire payload for the insert call. `request_id` keys the provider's
    /// idempotent conference creation and must be unique per event.
    ///
    /// Start/end ordering is not checked here; the remote service is the
    /// authority on what it accepts.
    pub fn to_payload(&self, request_id: &str) -> EventPayload {
        EventPayload {
            summary: self.summary.clone(),
            start: EventDateTime {
                date_time: self.start.format(ISO_FORMAT).to_string(),
                time_zone: TIME_ZONE.to_string(),
            },
            end: EventDateTime {
                date_time: self.end.format(ISO_FORMAT).to_string(),
                time_zone: TIME_ZONE.to_string(),
            },
            attendees: self
                .attendees
                .iter()
                .map(|email| EventAttendee {
                    email: email.clone(),
                })
                .collect(),
            conference_data: self.with_meet.then(|| ConferenceData {
                create_request: Some(CreateConferenceRequest {
                    conference_solution_key: ConferenceSolutionKey {
                        kind: MEET_SOLUTION.to_string(),
                    },
                    request_id: request_id.to_string(),
                }),
                entry_points: Vec::new(),
            }),
        }
    }
}

/// Links reported back once the event exists.
#[derive(Debug, Clone)]
pub struct EventResult {
    pub event_link: String,
    pub meet_link: String,
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp (interpreted as UTC).
pub fn parse_datetime(input: &str) -> MkMeetResult<NaiveDateTime> {
    let trimmed = input.trim();
    NaiveDateTime::parse_from_str(trimmed, INPUT_FORMAT).map_err(|_| {
        MkMeetError::Input(format!(
            "could not parse \"{trimmed}\" as YYYY-MM-DD HH:MM:SS"
        ))
    })
}

/// Split a comma-separated attendee list, trimming whitespace and dropping
/// empty entries (a blank input means no attendees).
pub fn parse_attendees(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string)
        .collect()
}
