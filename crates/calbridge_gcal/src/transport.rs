// --- File: crates/calbridge_gcal/src/transport.rs ---
//! The remote side of the facade.
//!
//! [`CalendarApi`] has one method per remote endpoint and speaks the generated schema
//! types. Listing methods return a single page. [`HubTransport`] implements it over the
//! authorized `CalendarHub`; tests plug in an in-memory implementation instead.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use calbridge_common::Result;
use chrono::{DateTime, Utc};
use google_calendar3::api::{
    CalendarList, CalendarListEntry, Event, Events, FreeBusyRequest, FreeBusyResponse,
};
use tracing::debug;

use crate::auth::HubType;
use crate::error::map_api_error;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Parameters of one listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub time_min: Option<DateTime<Utc>>,
    pub time_max: Option<DateTime<Utc>>,
    pub query: Option<String>,
    pub page_size: Option<u32>,
    pub page_token: Option<String>,
}

/// Remote calendar operations.
pub trait CalendarApi: Send + Sync {
    fn list_calendars_page(&self, page_token: Option<String>) -> BoxFuture<'_, CalendarList>;

    fn get_calendar(&self, calendar_id: &str) -> BoxFuture<'_, CalendarListEntry>;

    /// One page of events, recurring events expanded and ordered by start time.
    fn list_events_page(&self, calendar_id: &str, query: PageQuery) -> BoxFuture<'_, Events>;

    fn get_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, Event>;

    fn insert_event(
        &self,
        calendar_id: &str,
        body: Event,
        conference_data_version: Option<i32>,
    ) -> BoxFuture<'_, Event>;

    fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        body: Event,
        conference_data_version: Option<i32>,
    ) -> BoxFuture<'_, Event>;

    fn patch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        body: Event,
        conference_data_version: Option<i32>,
    ) -> BoxFuture<'_, Event>;

    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, ()>;

    fn move_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        destination_calendar_id: &str,
    ) -> BoxFuture<'_, Event>;

    fn quick_add(&self, calendar_id: &str, text: &str) -> BoxFuture<'_, Event>;

    /// One page of instances of a recurring event. `query.query` is not used.
    fn list_instances_page(
        &self,
        calendar_id: &str,
        event_id: &str,
        query: PageQuery,
    ) -> BoxFuture<'_, Events>;

    fn query_free_busy(&self, request: FreeBusyRequest) -> BoxFuture<'_, FreeBusyResponse>;
}

/// [`CalendarApi`] backed by the generated Google Calendar hub.
#[derive(Clone)]
pub struct HubTransport {
    calendar_hub: Arc<HubType>,
}

impl HubTransport {
    pub fn new(calendar_hub: Arc<HubType>) -> Self {
        Self { calendar_hub }
    }
}

fn page_size(size: u32) -> i32 {
    i32::try_from(size).unwrap_or(i32::MAX)
}

impl CalendarApi for HubTransport {
    fn list_calendars_page(&self, page_token: Option<String>) -> BoxFuture<'_, CalendarList> {
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let mut call = calendar_hub.calendar_list().list();
            if let Some(token) = page_token.as_deref() {
                call = call.page_token(token);
            }
            let (_response, list) = call.doit().await.map_err(map_api_error)?;
            Ok(list)
        })
    }

    fn get_calendar(&self, calendar_id: &str) -> BoxFuture<'_, CalendarListEntry> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let (_response, entry) = calendar_hub
                .calendar_list()
                .get(&calendar_id)
                .doit()
                .await
                .map_err(map_api_error)?;
            Ok(entry)
        })
    }

    fn list_events_page(&self, calendar_id: &str, query: PageQuery) -> BoxFuture<'_, Events> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let mut call = calendar_hub
                .events()
                .list(&calendar_id)
                .single_events(true) // Expand recurring events
                .order_by("startTime");
            if let Some(time_min) = query.time_min {
                call = call.time_min(time_min);
            }
            if let Some(time_max) = query.time_max {
                call = call.time_max(time_max);
            }
            if let Some(q) = query.query.as_deref() {
                call = call.q(q);
            }
            if let Some(size) = query.page_size {
                call = call.max_results(page_size(size));
            }
            if let Some(token) = query.page_token.as_deref() {
                call = call.page_token(token);
            }

            debug!("events.list on {} (token: {:?})", calendar_id, query.page_token);
            let (_response, events) = call.doit().await.map_err(map_api_error)?;
            Ok(events)
        })
    }

    fn get_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, Event> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let (_response, event) = calendar_hub
                .events()
                .get(&calendar_id, &event_id)
                .doit()
                .await
                .map_err(map_api_error)?;
            Ok(event)
        })
    }

    fn insert_event(
        &self,
        calendar_id: &str,
        body: Event,
        conference_data_version: Option<i32>,
    ) -> BoxFuture<'_, Event> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let mut call = calendar_hub.events().insert(body, &calendar_id);
            if let Some(version) = conference_data_version {
                call = call.conference_data_version(version);
            }
            let (_response, created) = call.doit().await.map_err(map_api_error)?;
            Ok(created)
        })
    }

    fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        body: Event,
        conference_data_version: Option<i32>,
    ) -> BoxFuture<'_, Event> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let mut call = calendar_hub.events().update(body, &calendar_id, &event_id);
            if let Some(version) = conference_data_version {
                call = call.conference_data_version(version);
            }
            let (_response, updated) = call.doit().await.map_err(map_api_error)?;
            Ok(updated)
        })
    }

    fn patch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        body: Event,
        conference_data_version: Option<i32>,
    ) -> BoxFuture<'_, Event> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let mut call = calendar_hub.events().patch(body, &calendar_id, &event_id);
            if let Some(version) = conference_data_version {
                call = call.conference_data_version(version);
            }
            let (_response, patched) = call.doit().await.map_err(map_api_error)?;
            Ok(patched)
        })
    }

    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, ()> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            calendar_hub
                .events()
                .delete(&calendar_id, &event_id)
                .doit()
                .await
                .map_err(map_api_error)?;
            Ok(())
        })
    }

    fn move_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        destination_calendar_id: &str,
    ) -> BoxFuture<'_, Event> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let destination = destination_calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let (_response, moved) = calendar_hub
                .events()
                .move_(&calendar_id, &event_id, &destination)
                .doit()
                .await
                .map_err(map_api_error)?;
            Ok(moved)
        })
    }

    fn quick_add(&self, calendar_id: &str, text: &str) -> BoxFuture<'_, Event> {
        let calendar_id = calendar_id.to_string();
        let text = text.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let (_response, created) = calendar_hub
                .events()
                .quick_add(&calendar_id, &text)
                .doit()
                .await
                .map_err(map_api_error)?;
            Ok(created)
        })
    }

    fn list_instances_page(
        &self,
        calendar_id: &str,
        event_id: &str,
        query: PageQuery,
    ) -> BoxFuture<'_, Events> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let mut call = calendar_hub.events().instances(&calendar_id, &event_id);
            if let Some(time_min) = query.time_min {
                call = call.time_min(time_min);
            }
            if let Some(time_max) = query.time_max {
                call = call.time_max(time_max);
            }
            if let Some(size) = query.page_size {
                call = call.max_results(page_size(size));
            }
            if let Some(token) = query.page_token.as_deref() {
                call = call.page_token(token);
            }

            debug!("events.instances on {}/{} (token: {:?})", calendar_id, event_id, query.page_token);
            let (_response, events) = call.doit().await.map_err(map_api_error)?;
            Ok(events)
        })
    }

    fn query_free_busy(&self, request: FreeBusyRequest) -> BoxFuture<'_, FreeBusyResponse> {
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let (_response, freebusy_response) = calendar_hub
                .freebusy()
                .query(request)
                .doit()
                .await
                .map_err(map_api_error)?;
            Ok(freebusy_response)
        })
    }
}
