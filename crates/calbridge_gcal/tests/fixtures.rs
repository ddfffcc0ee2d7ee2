//! Test fixtures for the calendar facade
//!
//! `FakeCalendarApi` is an in-memory `CalendarApi`: it keeps calendars and events,
//! pages listings by offset tokens, answers free/busy queries and records every call
//! together with the request body it received.
#![allow(dead_code)]

use calbridge_common::Result;
use calbridge_gcal::error::from_error_body;
use calbridge_gcal::{BoxFuture, CalendarApi, PageQuery};
use chrono::{DateTime, Duration, TimeZone, Utc};
use google_calendar3::api::{
    CalendarList, CalendarListEntry, Event, Events, FreeBusyRequest, FreeBusyResponse,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// Page size used when a listing does not ask for one
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Calendars per calendar-list page
pub const CALENDAR_PAGE_SIZE: usize = 2;

/// A call received by the fake, with the request body as JSON
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListCalendars {
        page_token: Option<String>,
    },
    GetCalendar {
        calendar_id: String,
    },
    ListEvents {
        calendar_id: String,
        query: PageQuery,
    },
    GetEvent {
        calendar_id: String,
        event_id: String,
    },
    Insert {
        calendar_id: String,
        body: Value,
        conference_data_version: Option<i32>,
    },
    Update {
        calendar_id: String,
        event_id: String,
        body: Value,
        conference_data_version: Option<i32>,
    },
    Patch {
        calendar_id: String,
        event_id: String,
        body: Value,
        conference_data_version: Option<i32>,
    },
    Delete {
        calendar_id: String,
        event_id: String,
    },
    Move {
        calendar_id: String,
        event_id: String,
        destination: String,
    },
    QuickAdd {
        calendar_id: String,
        text: String,
    },
    ListInstances {
        calendar_id: String,
        event_id: String,
        query: PageQuery,
    },
    FreeBusy {
        body: Value,
    },
}

#[derive(Default)]
struct State {
    calendars: Vec<CalendarListEntry>,
    // (calendar id, event) in insertion order
    events: Vec<(String, Event)>,
    busy: HashMap<String, Vec<(DateTime<Utc>, DateTime<Utc>)>>,
    next_id: usize,
}

pub struct FakeCalendarApi {
    state: Mutex<State>,
    calls: Mutex<Vec<Call>>,
}

/// Fixed reference instant so listings are deterministic
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 5, 8, 0, 0).unwrap()
}

/// A wire event as the service would return it
pub fn wire_event(id: &str, summary: &str, start: DateTime<Utc>, minutes: i64) -> Event {
    serde_json::from_value(json!({
        "id": id,
        "summary": summary,
        "status": "confirmed",
        "htmlLink": format!("https://www.google.com/calendar/event?eid={}", id),
        "start": { "dateTime": start.to_rfc3339() },
        "end": { "dateTime": (start + Duration::minutes(minutes)).to_rfc3339() }
    }))
    .expect("valid event JSON")
}

fn not_found() -> calbridge_common::CalbridgeError {
    from_error_body(&json!({
        "error": {
            "code": 404,
            "message": "Not Found",
            "errors": [{ "domain": "global", "reason": "notFound", "message": "Not Found" }]
        }
    }))
}

fn gone() -> calbridge_common::CalbridgeError {
    from_error_body(&json!({
        "error": {
            "code": 410,
            "message": "Resource has been deleted",
            "errors": [{ "domain": "global", "reason": "deleted" }]
        }
    }))
}

fn offset(token: Option<&str>) -> usize {
    token.and_then(|t| t.parse().ok()).unwrap_or(0)
}

fn page<T: Clone>(items: &[T], token: Option<&str>, size: usize) -> (Vec<T>, Option<String>) {
    let start = offset(token).min(items.len());
    let end = (start + size).min(items.len());
    let next = (end < items.len()).then(|| end.to_string());
    (items[start..end].to_vec(), next)
}

// The hub drops nulls before sending; bodies are recorded the same way
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

fn to_json<T: serde::Serialize>(body: &T) -> Value {
    let mut value = serde_json::to_value(body).expect("body serializes");
    strip_nulls(&mut value);
    value
}

fn from_json(value: Value) -> Event {
    serde_json::from_value(value).expect("event deserializes")
}

impl FakeCalendarApi {
    /// A fake holding the primary calendar and two shared calendars, without events
    pub fn new() -> Self {
        let calendars = [
            json!({ "id": "primary", "summary": "me@example.com", "timeZone": "Europe/Zurich", "primary": true }),
            json!({ "id": "team@example.com", "summary": "Team", "description": "Shared team calendar" }),
            json!({ "id": "holidays@example.com", "summary": "Holidays" }),
        ]
        .into_iter()
        .map(|c| serde_json::from_value(c).expect("valid calendar JSON"))
        .collect();

        Self {
            state: Mutex::new(State {
                calendars,
                ..Default::default()
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Adds `count` half-hour events to a calendar, one per hour from [`base_time`]
    pub fn with_events(self, calendar_id: &str, count: usize) -> Self {
        for i in 0..count {
            let start = base_time() + Duration::hours(i as i64);
            let event = wire_event(&format!("seed{}", i), &format!("Event {}", i), start, 30);
            self.seed_event(calendar_id, event);
        }
        self
    }

    /// Adds a daily recurring master with `count` expanded instances
    pub fn with_recurring(self, calendar_id: &str, master_id: &str, count: usize) -> Self {
        let mut master = wire_event(master_id, "Daily standup", base_time(), 15);
        master.recurrence = Some(vec![format!("RRULE:FREQ=DAILY;COUNT={}", count)]);
        self.seed_event(calendar_id, master);

        for i in 0..count {
            let start = base_time() + Duration::days(i as i64);
            let mut instance = wire_event(
                &format!("{}_{}", master_id, start.format("%Y%m%dT%H%M%SZ")),
                "Daily standup",
                start,
                15,
            );
            instance.recurring_event_id = Some(master_id.to_string());
            self.seed_event(calendar_id, instance);
        }
        self
    }

    /// Marks a range busy for a calendar's free/busy answer
    pub fn with_busy(self, calendar_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.state
            .lock()
            .unwrap()
            .busy
            .entry(calendar_id.to_string())
            .or_default()
            .push((start, end));
        self
    }

    pub fn seed_event(&self, calendar_id: &str, event: Event) {
        self.state
            .lock()
            .unwrap()
            .events
            .push((calendar_id.to_string(), event));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of event listing requests received
    pub fn list_event_fetches(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::ListEvents { .. }))
            .count()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// The stored event, as the service would return it now
    pub fn stored(&self, calendar_id: &str, event_id: &str) -> Option<Event> {
        self.state
            .lock()
            .unwrap()
            .events
            .iter()
            .find(|(cal, e)| cal == calendar_id && e.id.as_deref() == Some(event_id))
            .map(|(_, e)| e.clone())
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn position(state: &State, calendar_id: &str, event_id: &str) -> Option<usize> {
        state
            .events
            .iter()
            .position(|(cal, e)| cal == calendar_id && e.id.as_deref() == Some(event_id))
    }

    fn has_calendar(state: &State, calendar_id: &str) -> bool {
        state
            .calendars
            .iter()
            .any(|c| c.id.as_deref() == Some(calendar_id))
    }

    // Fills the server-assigned fields the way the service does
    fn finish(state: &mut State, mut event: Event, conference_data_version: Option<i32>) -> Event {
        if event.id.is_none() {
            state.next_id += 1;
            event.id = Some(format!("created{}", state.next_id));
        }
        event.status.get_or_insert_with(|| "confirmed".to_string());
        if let Some(id) = event.id.clone() {
            event.html_link = Some(format!("https://www.google.com/calendar/event?eid={}", id));
        }
        // conferenceData is only honored with conferenceDataVersion=1
        if conference_data_version == Some(1) {
            let request_id = event
                .conference_data
                .as_ref()
                .and_then(|c| c.create_request.as_ref())
                .and_then(|r| r.request_id.clone());
            if let Some(request_id) = request_id {
                event.hangout_link = Some(format!("https://meet.google.com/{}", &request_id[..8]));
            }
        } else {
            event.conference_data = None;
        }
        event
    }

    fn do_list_events(&self, calendar_id: &str, query: &PageQuery) -> Result<Events> {
        let state = self.state.lock().unwrap();
        if !Self::has_calendar(&state, calendar_id) {
            return Err(not_found());
        }

        let mut matching: Vec<Event> = state
            .events
            .iter()
            .filter(|(cal, _)| cal == calendar_id)
            .map(|(_, e)| e.clone())
            // singleEvents=true lists instances instead of masters
            .filter(|e| e.recurrence.is_none())
            .filter(|e| {
                let start = e.start.as_ref().and_then(|s| s.date_time);
                let end = e.end.as_ref().and_then(|s| s.date_time);
                let after_min = match (query.time_min, end) {
                    (Some(min), Some(end)) => end > min,
                    _ => true,
                };
                let before_max = match (query.time_max, start) {
                    (Some(max), Some(start)) => start < max,
                    _ => true,
                };
                after_min && before_max
            })
            .filter(|e| {
                query.query.as_deref().map_or(true, |q| {
                    e.summary
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(&q.to_lowercase()))
                })
            })
            .collect();
        matching.sort_by_key(|e| e.start.as_ref().and_then(|s| s.date_time));

        let size = query.page_size.map_or(DEFAULT_PAGE_SIZE, |s| s as usize);
        let (items, next_page_token) = page(&matching, query.page_token.as_deref(), size);
        Ok(Events {
            items: Some(items),
            next_page_token,
            ..Default::default()
        })
    }

    fn do_list_instances(
        &self,
        calendar_id: &str,
        event_id: &str,
        query: &PageQuery,
    ) -> Result<Events> {
        let state = self.state.lock().unwrap();
        if Self::position(&state, calendar_id, event_id).is_none() {
            return Err(not_found());
        }

        let instances: Vec<Event> = state
            .events
            .iter()
            .filter(|(cal, e)| {
                cal == calendar_id && e.recurring_event_id.as_deref() == Some(event_id)
            })
            .map(|(_, e)| e.clone())
            .collect();

        let size = query.page_size.map_or(DEFAULT_PAGE_SIZE, |s| s as usize);
        let (items, next_page_token) = page(&instances, query.page_token.as_deref(), size);
        Ok(Events {
            items: Some(items),
            next_page_token,
            ..Default::default()
        })
    }

    fn do_insert(&self, calendar_id: &str, body: Event, cdv: Option<i32>) -> Result<Event> {
        let mut state = self.state.lock().unwrap();
        if !Self::has_calendar(&state, calendar_id) {
            return Err(not_found());
        }
        let event = Self::finish(&mut state, Event { id: None, ..body }, cdv);
        state.events.push((calendar_id.to_string(), event.clone()));
        Ok(event)
    }

    fn do_update(&self, calendar_id: &str, event_id: &str, body: Event, cdv: Option<i32>) -> Result<Event> {
        let mut state = self.state.lock().unwrap();
        let idx = Self::position(&state, calendar_id, event_id).ok_or_else(not_found)?;
        let replacement = Event {
            id: Some(event_id.to_string()),
            ..body
        };
        let event = Self::finish(&mut state, replacement, cdv);
        state.events[idx].1 = event.clone();
        Ok(event)
    }

    fn do_patch(&self, calendar_id: &str, event_id: &str, body: Event, cdv: Option<i32>) -> Result<Event> {
        let mut state = self.state.lock().unwrap();
        let idx = Self::position(&state, calendar_id, event_id).ok_or_else(not_found)?;

        // Top-level fields present in the body overwrite, everything else stays
        let mut merged = to_json(&state.events[idx].1);
        if let (Value::Object(target), Value::Object(changes)) = (&mut merged, to_json(&body)) {
            target.extend(changes);
        }
        let event = Self::finish(&mut state, from_json(merged), cdv);
        state.events[idx].1 = event.clone();
        Ok(event)
    }

    fn do_delete(&self, calendar_id: &str, event_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        match Self::position(&state, calendar_id, event_id) {
            Some(idx) => {
                state.events.remove(idx);
                Ok(())
            }
            None => Err(gone()),
        }
    }

    fn do_move(&self, calendar_id: &str, event_id: &str, destination: &str) -> Result<Event> {
        let mut state = self.state.lock().unwrap();
        if !Self::has_calendar(&state, destination) {
            return Err(not_found());
        }
        let idx = Self::position(&state, calendar_id, event_id).ok_or_else(not_found)?;
        state.events[idx].0 = destination.to_string();
        Ok(state.events[idx].1.clone())
    }

    fn do_quick_add(&self, calendar_id: &str, text: &str) -> Result<Event> {
        let mut state = self.state.lock().unwrap();
        if !Self::has_calendar(&state, calendar_id) {
            return Err(not_found());
        }
        // The service parses the sentence; the fake only keeps it as the title
        let mut event = wire_event("", text, base_time() + Duration::days(1), 60);
        event.id = None;
        event.html_link = None;
        let event = Self::finish(&mut state, event, None);
        state.events.push((calendar_id.to_string(), event.clone()));
        Ok(event)
    }

    fn do_free_busy(&self, request: &FreeBusyRequest) -> Result<FreeBusyResponse> {
        let state = self.state.lock().unwrap();
        let mut calendars = serde_json::Map::new();

        for item in request.items.iter().flatten() {
            let Some(id) = item.id.clone() else { continue };
            let entry = if Self::has_calendar(&state, &id) {
                let busy: Vec<Value> = state
                    .busy
                    .get(&id)
                    .into_iter()
                    .flatten()
                    .map(|(start, end)| json!({ "start": start.to_rfc3339(), "end": end.to_rfc3339() }))
                    .collect();
                json!({ "busy": busy })
            } else {
                json!({ "busy": [], "errors": [{ "domain": "global", "reason": "notFound" }] })
            };
            calendars.insert(id, entry);
        }

        Ok(serde_json::from_value(json!({
            "kind": "calendar#freeBusy",
            "timeMin": request.time_min.map(|t| t.to_rfc3339()),
            "timeMax": request.time_max.map(|t| t.to_rfc3339()),
            "calendars": calendars
        }))
        .expect("valid free/busy JSON"))
    }
}

impl Default for FakeCalendarApi {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarApi for FakeCalendarApi {
    fn list_calendars_page(&self, page_token: Option<String>) -> BoxFuture<'_, CalendarList> {
        self.record(Call::ListCalendars {
            page_token: page_token.clone(),
        });
        let calendars = self.state.lock().unwrap().calendars.clone();
        let (items, next_page_token) = page(&calendars, page_token.as_deref(), CALENDAR_PAGE_SIZE);
        let list = CalendarList {
            items: Some(items),
            next_page_token,
            ..Default::default()
        };
        Box::pin(async move { Ok(list) })
    }

    fn get_calendar(&self, calendar_id: &str) -> BoxFuture<'_, CalendarListEntry> {
        self.record(Call::GetCalendar {
            calendar_id: calendar_id.to_string(),
        });
        let result = self
            .state
            .lock()
            .unwrap()
            .calendars
            .iter()
            .find(|c| c.id.as_deref() == Some(calendar_id))
            .cloned()
            .ok_or_else(not_found);
        Box::pin(async move { result })
    }

    fn list_events_page(&self, calendar_id: &str, query: PageQuery) -> BoxFuture<'_, Events> {
        self.record(Call::ListEvents {
            calendar_id: calendar_id.to_string(),
            query: query.clone(),
        });
        let result = self.do_list_events(calendar_id, &query);
        Box::pin(async move { result })
    }

    fn get_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, Event> {
        self.record(Call::GetEvent {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
        });
        let result = self.stored(calendar_id, event_id).ok_or_else(not_found);
        Box::pin(async move { result })
    }

    fn insert_event(
        &self,
        calendar_id: &str,
        body: Event,
        conference_data_version: Option<i32>,
    ) -> BoxFuture<'_, Event> {
        self.record(Call::Insert {
            calendar_id: calendar_id.to_string(),
            body: to_json(&body),
            conference_data_version,
        });
        let result = self.do_insert(calendar_id, body, conference_data_version);
        Box::pin(async move { result })
    }

    fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        body: Event,
        conference_data_version: Option<i32>,
    ) -> BoxFuture<'_, Event> {
        self.record(Call::Update {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
            body: to_json(&body),
            conference_data_version,
        });
        let result = self.do_update(calendar_id, event_id, body, conference_data_version);
        Box::pin(async move { result })
    }

    fn patch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        body: Event,
        conference_data_version: Option<i32>,
    ) -> BoxFuture<'_, Event> {
        self.record(Call::Patch {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
            body: to_json(&body),
            conference_data_version,
        });
        let result = self.do_patch(calendar_id, event_id, body, conference_data_version);
        Box::pin(async move { result })
    }

    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, ()> {
        self.record(Call::Delete {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
        });
        let result = self.do_delete(calendar_id, event_id);
        Box::pin(async move { result })
    }

    fn move_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        destination_calendar_id: &str,
    ) -> BoxFuture<'_, Event> {
        self.record(Call::Move {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
            destination: destination_calendar_id.to_string(),
        });
        let result = self.do_move(calendar_id, event_id, destination_calendar_id);
        Box::pin(async move { result })
    }

    fn quick_add(&self, calendar_id: &str, text: &str) -> BoxFuture<'_, Event> {
        self.record(Call::QuickAdd {
            calendar_id: calendar_id.to_string(),
            text: text.to_string(),
        });
        let result = self.do_quick_add(calendar_id, text);
        Box::pin(async move { result })
    }

    fn list_instances_page(
        &self,
        calendar_id: &str,
        event_id: &str,
        query: PageQuery,
    ) -> BoxFuture<'_, Events> {
        self.record(Call::ListInstances {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
            query: query.clone(),
        });
        let result = self.do_list_instances(calendar_id, event_id, &query);
        Box::pin(async move { result })
    }

    fn query_free_busy(&self, request: FreeBusyRequest) -> BoxFuture<'_, FreeBusyResponse> {
        self.record(Call::FreeBusy {
            body: to_json(&request),
        });
        let result = self.do_free_busy(&request);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_event_shape() {
        let event = wire_event("abc", "Review", base_time(), 45);
        assert_eq!(event.id.as_deref(), Some("abc"));
        let start = event.start.and_then(|s| s.date_time).unwrap();
        let end = event.end.and_then(|s| s.date_time).unwrap();
        assert_eq!(end - start, Duration::minutes(45));
    }

    #[test]
    fn test_page_offsets() {
        let items: Vec<u32> = (0..12).collect();
        let (first, token) = page(&items, None, 10);
        assert_eq!(first.len(), 10);
        assert_eq!(token.as_deref(), Some("10"));
        let (second, token) = page(&items, token.as_deref(), 10);
        assert_eq!(second, vec![10, 11]);
        assert_eq!(token, None);
    }

    #[test]
    fn test_with_events_seeds_calendar() {
        let fake = FakeCalendarApi::new().with_events("primary", 3);
        assert!(fake.stored("primary", "seed2").is_some());
        assert!(fake.stored("team@example.com", "seed2").is_none());
    }
}
