// --- File: crates/calbridge_gcal/src/normalize.rs ---
//! Conversion from the generated API schema types to the local records.
//!
//! One function per entity. Every optional wire field gets its documented default here
//! so nothing past this module has to deal with absence.

use google_calendar3::api::{
    self, CalendarListEntry, EventAttendee, EventDateTime, EventReminders, FreeBusyResponse,
};
use tracing::warn;

use crate::models::{
    Attendee, BusyInterval, Calendar, CalendarBusy, Event, EventTime, FreeBusyResult,
    ReminderOverride, Reminders,
};

pub fn normalize_calendar(entry: CalendarListEntry) -> Calendar {
    Calendar {
        id: entry.id.unwrap_or_default(),
        summary: entry.summary.unwrap_or_default(),
        description: entry.description.unwrap_or_default(),
        time_zone: entry.time_zone.unwrap_or_default(),
        primary: entry.primary.unwrap_or(false),
    }
}

pub fn normalize_event(event: api::Event) -> Event {
    Event {
        id: event.id.unwrap_or_default(),
        summary: event.summary.unwrap_or_default(),
        description: event.description.unwrap_or_default(),
        location: event.location.unwrap_or_default(),
        start_time_zone: time_zone(event.start.as_ref()),
        end_time_zone: time_zone(event.end.as_ref()),
        start: normalize_time(event.start),
        end: normalize_time(event.end),
        attendees: event
            .attendees
            .unwrap_or_default()
            .into_iter()
            .map(normalize_attendee)
            .collect(),
        recurrence: event.recurrence.unwrap_or_default(),
        status: event.status.unwrap_or_default(),
        color_id: event.color_id.unwrap_or_default(),
        hangout_link: event.hangout_link.unwrap_or_default(),
        html_link: event.html_link.unwrap_or_default(),
        reminders: normalize_reminders(event.reminders),
    }
}

// An exact instant wins over a date if the service ever sends both.
fn normalize_time(time: Option<EventDateTime>) -> EventTime {
    match time {
        Some(EventDateTime {
            date_time: Some(dt),
            ..
        }) => EventTime::DateTime(dt),
        Some(EventDateTime { date: Some(d), .. }) => EventTime::Date(d),
        _ => EventTime::Unset,
    }
}

fn time_zone(time: Option<&EventDateTime>) -> String {
    time.and_then(|t| t.time_zone.clone()).unwrap_or_default()
}

fn normalize_attendee(attendee: EventAttendee) -> Attendee {
    Attendee {
        email: attendee.email.unwrap_or_default(),
        display_name: attendee.display_name,
        response_status: attendee.response_status,
    }
}

fn normalize_reminders(reminders: Option<EventReminders>) -> Reminders {
    let Some(reminders) = reminders else {
        return Reminders::default();
    };

    Reminders {
        use_default: reminders.use_default.unwrap_or(true),
        overrides: reminders.overrides.map(|overrides| {
            overrides
                .into_iter()
                .map(|o| ReminderOverride {
                    method: o.method.unwrap_or_default(),
                    minutes: o.minutes.unwrap_or(0),
                })
                .collect()
        }),
    }
}

pub fn normalize_free_busy(response: FreeBusyResponse) -> FreeBusyResult {
    let calendars = response
        .calendars
        .unwrap_or_default()
        .into_iter()
        .map(|(calendar_id, calendar)| {
            let busy = calendar
                .busy
                .unwrap_or_default()
                .into_iter()
                .filter_map(|period| match (period.start, period.end) {
                    (Some(start), Some(end)) => Some(BusyInterval { start, end }),
                    (start, end) => {
                        warn!(
                            "Skipping busy period with missing start/end on {}: {:?} - {:?}",
                            calendar_id, start, end
                        );
                        None
                    }
                })
                .collect();
            let errors = calendar.errors.map(|errors| {
                errors
                    .into_iter()
                    .map(|e| e.reason.unwrap_or_default())
                    .collect()
            });
            (calendar_id, CalendarBusy { busy, errors })
        })
        .collect();

    FreeBusyResult { calendars }
}
