//! Local record shapes.
//!
//! Everything returned by [`crate::client::CalendarClient`] uses these types. Read
//! records (`Calendar`, `Event`, `FreeBusyResult`) never carry "missing" fields: the
//! normalizers in [`crate::normalize`] fill every absent remote value with the
//! default documented on the field.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::color::EventColor;

/// A calendar from the user's calendar list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    pub summary: String,
    /// `""` when unset
    pub description: String,
    /// IANA zone name, `""` when unset
    pub time_zone: String,
    /// `false` when unset
    pub primary: bool,
}

/// Start or end of an event.
///
/// Timed events carry an instant, all-day events a calendar date. `Unset` only appears
/// on records the service returned without either (e.g. some cancelled instances).
/// Instants are kept in UTC; the zone the event was scheduled in is on
/// [`Event::start_time_zone`] and [`Event::end_time_zone`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    #[default]
    Unset,
}

impl EventTime {
    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        match self {
            EventTime::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            EventTime::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl From<DateTime<Utc>> for EventTime {
    fn from(value: DateTime<Utc>) -> Self {
        EventTime::DateTime(value)
    }
}

impl From<NaiveDate> for EventTime {
    fn from(value: NaiveDate) -> Self {
        EventTime::Date(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    /// `""` when the service omitted it
    pub email: String,
    /// Only ever populated by the service. Ignored on input.
    pub display_name: Option<String>,
    /// `needsAction`, `declined`, `tentative` or `accepted`. Ignored on input.
    pub response_status: Option<String>,
}

impl Attendee {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderOverride {
    /// `email` or `popup`; `""` when unset
    pub method: String,
    /// Minutes before start, `0` when unset
    pub minutes: i32,
}

impl ReminderOverride {
    pub fn email(minutes: i32) -> Self {
        Self {
            method: "email".to_string(),
            minutes,
        }
    }

    pub fn popup(minutes: i32) -> Self {
        Self {
            method: "popup".to_string(),
            minutes,
        }
    }
}

/// Reminder settings. An event without a reminders block uses the calendar defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Option<Vec<ReminderOverride>>,
}

impl Default for Reminders {
    fn default() -> Self {
        Self {
            use_default: true,
            overrides: None,
        }
    }
}

impl Reminders {
    /// Custom reminders replacing the calendar defaults.
    pub fn custom(overrides: Vec<ReminderOverride>) -> Self {
        Self {
            use_default: false,
            overrides: Some(overrides),
        }
    }
}

/// A normalized event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: EventTime,
    pub end: EventTime,
    /// IANA zone sent with `start`, `""` when unset
    pub start_time_zone: String,
    /// IANA zone sent with `end`, `""` when unset
    pub end_time_zone: String,
    pub attendees: Vec<Attendee>,
    /// RRULE/EXDATE lines, empty for single events
    pub recurrence: Vec<String>,
    /// `confirmed`, `tentative` or `cancelled`; `""` when unset
    pub status: String,
    pub color_id: String,
    pub hangout_link: String,
    pub html_link: String,
    pub reminders: Reminders,
}

impl Event {
    /// The known color for `color_id`, if any.
    pub fn color(&self) -> Option<EventColor> {
        EventColor::from_code(&self.color_id)
    }

    pub fn is_recurring(&self) -> bool {
        !self.recurrence.is_empty()
    }
}

/// Complete event contents for create and replace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventInput {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    /// Reduced to email addresses on submission
    pub attendees: Option<Vec<Attendee>>,
    /// Attached to both `start` and `end`
    pub time_zone: Option<String>,
    pub recurrence: Option<Vec<String>>,
    /// Usually an [`EventColor`] code, unknown codes are sent as-is
    pub color_id: Option<String>,
    pub reminders: Option<Reminders>,
    /// Ask the service to generate a meeting link
    pub add_meet_link: bool,
}

impl EventInput {
    pub fn new(start: impl Into<EventTime>, end: impl Into<EventTime>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            ..Default::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_attendees(mut self, attendees: Vec<Attendee>) -> Self {
        self.attendees = Some(attendees);
        self
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    pub fn with_recurrence(mut self, recurrence: Vec<String>) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    pub fn with_color(mut self, color: EventColor) -> Self {
        self.color_id = Some(color.code().to_string());
        self
    }

    pub fn with_reminders(mut self, reminders: Reminders) -> Self {
        self.reminders = Some(reminders);
        self
    }

    pub fn with_meet_link(mut self) -> Self {
        self.add_meet_link = true;
        self
    }
}

/// Partial event update.
///
/// `None` leaves the remote field untouched. `Some` is always sent, including empty
/// values: `Some(String::new())` clears a text field, `Some(vec![])` clears a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub attendees: Option<Vec<Attendee>>,
    /// Attached to `start`/`end` when those are present, otherwise unused
    pub time_zone: Option<String>,
    pub recurrence: Option<Vec<String>>,
    pub color_id: Option<String>,
    pub reminders: Option<Reminders>,
    pub add_meet_link: bool,
}

impl EventPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_start(mut self, start: impl Into<EventTime>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_end(mut self, end: impl Into<EventTime>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn with_attendees(mut self, attendees: Vec<Attendee>) -> Self {
        self.attendees = Some(attendees);
        self
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    pub fn with_recurrence(mut self, recurrence: Vec<String>) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    pub fn with_color(mut self, color: EventColor) -> Self {
        self.color_id = Some(color.code().to_string());
        self
    }

    pub fn with_reminders(mut self, reminders: Reminders) -> Self {
        self.reminders = Some(reminders);
        self
    }

    pub fn with_meet_link(mut self) -> Self {
        self.add_meet_link = true;
        self
    }
}

/// Filters for event and instance listings.
///
/// `time_min`, `time_max` and `query` are handed to the service unchanged; their
/// boundary and matching rules are the service's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEventsOptions {
    pub time_min: Option<DateTime<Utc>>,
    pub time_max: Option<DateTime<Utc>>,
    /// Free-text search. Not supported for instance listings.
    pub query: Option<String>,
    /// Upper bound on the number of returned events. `None` lists everything;
    /// `Some(0)` returns nothing without calling the service.
    pub max_results: Option<usize>,
    /// Per-request page size hint, independent from `max_results`
    pub page_size: Option<u32>,
}

impl ListEventsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn between(time_min: DateTime<Utc>, time_max: DateTime<Utc>) -> Self {
        Self {
            time_min: Some(time_min),
            time_max: Some(time_max),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeBusyRequest {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub calendar_ids: Vec<String>,
    /// Zone used in the response, the service defaults to UTC
    pub time_zone: Option<String>,
}

impl FreeBusyRequest {
    pub fn new(time_min: DateTime<Utc>, time_max: DateTime<Utc>) -> Self {
        Self {
            time_min,
            time_max,
            calendar_ids: Vec::new(),
            time_zone: None,
        }
    }

    pub fn with_calendar(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_ids.push(calendar_id.into());
        self
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Busy data for one calendar. Errors and busy intervals can coexist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarBusy {
    pub busy: Vec<BusyInterval>,
    /// Reasons such as `notFound`; `None` when the service reported no error
    pub errors: Option<Vec<String>>,
}

impl CalendarBusy {
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// Free/busy answer keyed by calendar id.
///
/// Calendars missing from the service response are missing here as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeBusyResult {
    pub calendars: BTreeMap<String, CalendarBusy>,
}
