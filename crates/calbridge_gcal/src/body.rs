// --- File: crates/calbridge_gcal/src/body.rs ---
//! Request body construction for create, replace and patch.
//!
//! `None` on a generated schema field is dropped from the JSON the hub sends, so
//! leaving a field `None` here means "not part of the request". Explicit empty values
//! (`Some("")`, `Some(vec![])`) are sent as-is.

use google_calendar3::api::{
    self, ConferenceData, ConferenceSolutionKey, CreateConferenceRequest, EventAttendee,
    EventDateTime, EventReminder, EventReminders,
};
use uuid::Uuid;

use crate::models::{Attendee, EventInput, EventPatch, EventTime, Reminders};

/// Conference solution requested for generated meeting links.
pub const MEET_SOLUTION_TYPE: &str = "hangoutsMeet";

/// `conferenceDataVersion` that makes the service honor `conferenceData` in bodies.
pub const CONFERENCE_DATA_VERSION: i32 = 1;

/// The `conferenceDataVersion` query value for a call, if one is needed.
pub fn conference_data_version(add_meet_link: bool) -> Option<i32> {
    add_meet_link.then_some(CONFERENCE_DATA_VERSION)
}

/// A fresh meeting-link creation request. Every call gets a new random request id.
pub fn new_conference_request() -> ConferenceData {
    ConferenceData {
        create_request: Some(CreateConferenceRequest {
            request_id: Some(Uuid::new_v4().to_string()),
            conference_solution_key: Some(ConferenceSolutionKey {
                type_: Some(MEET_SOLUTION_TYPE.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Body for `events.insert`.
pub fn build_event_body(input: EventInput) -> api::Event {
    let time_zone = input.time_zone.as_deref();

    api::Event {
        summary: input.summary,
        description: input.description,
        location: input.location,
        color_id: input.color_id,
        start: Some(to_event_date_time(input.start, time_zone)),
        end: Some(to_event_date_time(input.end, time_zone)),
        attendees: input.attendees.as_deref().map(to_api_attendees),
        recurrence: input.recurrence,
        reminders: input.reminders.map(to_api_reminders),
        conference_data: input.add_meet_link.then(new_conference_request),
        ..Default::default()
    }
}

/// Body for `events.update`.
///
/// Same as [`build_event_body`], except that a missing attendee list is sent as an
/// explicit empty list: the replacement must not keep the previous attendees.
pub fn build_replacement_body(input: EventInput) -> api::Event {
    let mut body = build_event_body(input);
    if body.attendees.is_none() {
        body.attendees = Some(Vec::new());
    }
    body
}

/// Body for `events.patch`: only fields present on the patch.
pub fn build_patch_body(patch: EventPatch) -> api::Event {
    let time_zone = patch.time_zone.as_deref();

    api::Event {
        summary: patch.summary,
        description: patch.description,
        location: patch.location,
        color_id: patch.color_id,
        start: patch.start.map(|start| to_event_date_time(start, time_zone)),
        end: patch.end.map(|end| to_event_date_time(end, time_zone)),
        attendees: patch.attendees.as_deref().map(to_api_attendees),
        recurrence: patch.recurrence,
        reminders: patch.reminders.map(to_api_reminders),
        conference_data: patch.add_meet_link.then(new_conference_request),
        ..Default::default()
    }
}

fn to_event_date_time(time: EventTime, time_zone: Option<&str>) -> EventDateTime {
    let time_zone = time_zone.map(str::to_string);
    match time {
        EventTime::DateTime(dt) => EventDateTime {
            date_time: Some(dt),
            time_zone,
            ..Default::default()
        },
        EventTime::Date(d) => EventDateTime {
            date: Some(d),
            time_zone,
            ..Default::default()
        },
        EventTime::Unset => EventDateTime {
            time_zone,
            ..Default::default()
        },
    }
}

// Display names and response status belong to the service; only the address is sent.
fn to_api_attendees(attendees: &[Attendee]) -> Vec<EventAttendee> {
    attendees
        .iter()
        .map(|a| EventAttendee {
            email: Some(a.email.clone()),
            ..Default::default()
        })
        .collect()
}

fn to_api_reminders(reminders: Reminders) -> EventReminders {
    EventReminders {
        use_default: Some(reminders.use_default),
        overrides: reminders.overrides.map(|overrides| {
            overrides
                .into_iter()
                .map(|o| EventReminder {
                    method: Some(o.method),
                    minutes: Some(o.minutes),
                    ..Default::default()
                })
                .collect()
        }),
        ..Default::default()
    }
}
