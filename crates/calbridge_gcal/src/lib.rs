// --- File: crates/calbridge_gcal/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod body;
pub mod client;
pub mod color;
pub mod error;
pub mod models;
pub mod normalize;
pub mod pagination;
#[cfg(test)]
mod pagination_proptest;
pub mod transport;

pub use auth::{create_calendar_hub, HubType};
pub use client::{connect, CalendarClient, DEFAULT_CALENDAR_ID};
pub use color::EventColor;
pub use models::{
    Attendee, BusyInterval, Calendar, CalendarBusy, Event, EventInput, EventPatch, EventTime,
    FreeBusyRequest, FreeBusyResult, ListEventsOptions, ReminderOverride, Reminders,
};
pub use transport::{BoxFuture, CalendarApi, HubTransport, PageQuery};
