// --- File: crates/calbridge_gcal/src/client.rs ---
//! The calendar facade.
//!
//! [`CalendarClient`] turns typed requests into calls on a [`CalendarApi`] and hands
//! back normalized records. It keeps no state between calls besides the shared
//! transport, so clones are cheap and can be used from several tasks at once.

use std::sync::Arc;

use calbridge_common::{log_result, Result};
use calbridge_config::GcalConfig;
use google_calendar3::api::{self, FreeBusyRequestItem};
use tracing::{debug, info};

use crate::auth::create_calendar_hub;
use crate::body::{
    build_event_body, build_patch_body, build_replacement_body, conference_data_version,
};
use crate::models::{
    Calendar, Event, EventInput, EventPatch, FreeBusyRequest, FreeBusyResult, ListEventsOptions,
};
use crate::normalize::{normalize_calendar, normalize_event, normalize_free_busy};
use crate::pagination::{collect_pages, Page};
use crate::transport::{CalendarApi, HubTransport, PageQuery};

/// Calendar used when the configuration does not name one
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Google Calendar facade.
pub struct CalendarClient<A: CalendarApi = HubTransport> {
    api: Arc<A>,
    default_calendar_id: String,
}

impl<A: CalendarApi> Clone for CalendarClient<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            default_calendar_id: self.default_calendar_id.clone(),
        }
    }
}

impl<A: CalendarApi> CalendarClient<A> {
    /// Create a new client over a transport.
    pub fn new(api: A) -> Self {
        Self::from_arc(Arc::new(api))
    }

    /// Create a client sharing an existing transport.
    pub fn from_arc(api: Arc<A>) -> Self {
        Self {
            api,
            default_calendar_id: DEFAULT_CALENDAR_ID.to_string(),
        }
    }

    /// Sets the calendar callers fall back to. An empty id keeps the current one.
    pub fn with_default_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        let calendar_id = calendar_id.into();
        if !calendar_id.is_empty() {
            self.default_calendar_id = calendar_id;
        }
        self
    }

    /// The configured calendar (`gcal.calendar_id`), `"primary"` unless set.
    pub fn default_calendar_id(&self) -> &str {
        &self.default_calendar_id
    }

    /// Lists every calendar in the user's calendar list.
    ///
    /// All pages are followed; there is no cap.
    pub async fn list_calendars(&self) -> Result<Vec<Calendar>> {
        debug!("Listing calendars");
        let api = &self.api;

        collect_pages(None, move |page_token| async move {
            let list = api.list_calendars_page(page_token).await?;
            Ok(Page {
                items: list
                    .items
                    .unwrap_or_default()
                    .into_iter()
                    .map(normalize_calendar)
                    .collect(),
                next_page_token: list.next_page_token,
            })
        })
        .await
    }

    pub async fn get_calendar(&self, calendar_id: &str) -> Result<Calendar> {
        debug!("Fetching calendar {}", calendar_id);
        let entry = self.api.get_calendar(calendar_id).await?;
        Ok(normalize_calendar(entry))
    }

    /// Lists events of a calendar ordered by start time, recurring events expanded.
    ///
    /// # Arguments
    ///
    /// * `calendar_id` - The calendar to read (e.g. "primary")
    /// * `options` - Time window, free-text query, result cap and page size
    ///
    /// # Returns
    ///
    /// At most `options.max_results` events. Pages are requested one after another
    /// until the service stops returning a continuation token or enough events were
    /// collected; the surplus of the last page is dropped.
    ///
    /// # Errors
    ///
    /// Any remote failure aborts the listing; no partial result is returned.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let next_week = client
    ///     .list_events(
    ///         "primary",
    ///         &ListEventsOptions::between(Utc::now(), Utc::now() + Duration::days(7))
    ///             .with_max_results(20),
    ///     )
    ///     .await?;
    /// ```
    pub async fn list_events(
        &self,
        calendar_id: &str,
        options: &ListEventsOptions,
    ) -> Result<Vec<Event>> {
        debug!(
            "Listing events on {} (max_results: {:?})",
            calendar_id, options.max_results
        );
        let api = &self.api;
        let base = page_query(options, true);

        collect_pages(options.max_results, move |page_token| {
            let query = PageQuery {
                page_token,
                ..base.clone()
            };
            async move { events_page(api.list_events_page(calendar_id, query).await?) }
        })
        .await
    }

    pub async fn get_event(&self, calendar_id: &str, event_id: &str) -> Result<Event> {
        debug!("Fetching event {} from {}", event_id, calendar_id);
        let event = self.api.get_event(calendar_id, event_id).await?;
        Ok(normalize_event(event))
    }

    /// Creates an event.
    ///
    /// With `add_meet_link` set, a meeting link is requested with a fresh request id
    /// and the call carries `conferenceDataVersion=1`.
    pub async fn create_event(&self, calendar_id: &str, input: EventInput) -> Result<Event> {
        let version = conference_data_version(input.add_meet_link);
        let body = build_event_body(input);

        let created = self.api.insert_event(calendar_id, body, version).await?;
        let event = normalize_event(created);
        info!("Created event {} on {}", event.id, calendar_id);
        Ok(event)
    }

    /// Replaces an event.
    ///
    /// Fields missing from `input` are cleared on the remote event. That includes
    /// attendees: an input without attendees removes all of them.
    pub async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        input: EventInput,
    ) -> Result<Event> {
        let version = conference_data_version(input.add_meet_link);
        let body = build_replacement_body(input);

        let updated = self
            .api
            .update_event(calendar_id, event_id, body, version)
            .await?;
        info!("Replaced event {} on {}", event_id, calendar_id);
        Ok(normalize_event(updated))
    }

    /// Applies a partial update. Only fields set on `patch` are sent.
    pub async fn patch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: EventPatch,
    ) -> Result<Event> {
        let version = conference_data_version(patch.add_meet_link);
        let body = build_patch_body(patch);

        let patched = self
            .api
            .patch_event(calendar_id, event_id, body, version)
            .await?;
        info!("Patched event {} on {}", event_id, calendar_id);
        Ok(normalize_event(patched))
    }

    /// Deletes an event. Deleting an already deleted event fails with `NotFound`.
    pub async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<()> {
        log_result(
            self.api.delete_event(calendar_id, event_id).await,
            &format!("Deleted event {} from {}", event_id, calendar_id),
            &format!("Failed to delete event {} from {}", event_id, calendar_id),
        )
    }

    /// Moves an event to another calendar and returns it as seen there.
    pub async fn move_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        destination_calendar_id: &str,
    ) -> Result<Event> {
        let moved = self
            .api
            .move_event(calendar_id, event_id, destination_calendar_id)
            .await?;
        info!(
            "Moved event {} from {} to {}",
            event_id, calendar_id, destination_calendar_id
        );
        Ok(normalize_event(moved))
    }

    /// Creates an event from a natural-language sentence, e.g. "Lunch tomorrow 12:30".
    pub async fn quick_add(&self, calendar_id: &str, text: &str) -> Result<Event> {
        let created = self.api.quick_add(calendar_id, text).await?;
        let event = normalize_event(created);
        info!("Quick-added event {} on {}", event.id, calendar_id);
        Ok(event)
    }

    /// Lists the occurrences of a recurring event.
    ///
    /// Same paging rules as [`CalendarClient::list_events`]. `options.query` is ignored.
    pub async fn list_instances(
        &self,
        calendar_id: &str,
        event_id: &str,
        options: &ListEventsOptions,
    ) -> Result<Vec<Event>> {
        debug!(
            "Listing instances of {} on {} (max_results: {:?})",
            event_id, calendar_id, options.max_results
        );
        let api = &self.api;
        let base = page_query(options, false);

        collect_pages(options.max_results, move |page_token| {
            let query = PageQuery {
                page_token,
                ..base.clone()
            };
            async move {
                events_page(
                    api.list_instances_page(calendar_id, event_id, query)
                        .await?,
                )
            }
        })
        .await
    }

    /// Queries busy intervals of several calendars in one call.
    ///
    /// Each calendar the service reports on gets an entry. A calendar the caller may
    /// not read comes back with `errors` set instead of failing the whole query.
    pub async fn free_busy(&self, request: &FreeBusyRequest) -> Result<FreeBusyResult> {
        debug!(
            "Querying free/busy for {} calendar(s) between {} and {}",
            request.calendar_ids.len(),
            request.time_min,
            request.time_max
        );

        let req = api::FreeBusyRequest {
            time_min: Some(request.time_min),
            time_max: Some(request.time_max),
            time_zone: request.time_zone.clone(),
            items: Some(
                request
                    .calendar_ids
                    .iter()
                    .map(|id| FreeBusyRequestItem {
                        id: Some(id.clone()),
                        ..Default::default()
                    })
                    .collect(),
            ),
            ..Default::default()
        };

        let response = self.api.query_free_busy(req).await?;
        Ok(normalize_free_busy(response))
    }
}

fn page_query(options: &ListEventsOptions, with_query: bool) -> PageQuery {
    PageQuery {
        time_min: options.time_min,
        time_max: options.time_max,
        query: if with_query {
            options.query.clone()
        } else {
            None
        },
        page_size: options.page_size,
        page_token: None,
    }
}

fn events_page(events: api::Events) -> Result<Page<Event>> {
    Ok(Page {
        items: events
            .items
            .unwrap_or_default()
            .into_iter()
            .map(normalize_event)
            .collect(),
        next_page_token: events.next_page_token,
    })
}

/// Authorizes against Google with the configured credentials and returns a client
/// whose default calendar is `config.calendar_id`.
pub async fn connect(config: &GcalConfig) -> Result<CalendarClient<HubTransport>> {
    let hub = create_calendar_hub(config).await?;
    Ok(CalendarClient::new(HubTransport::new(Arc::new(hub)))
        .with_default_calendar_id(config.calendar_id.as_str()))
}
