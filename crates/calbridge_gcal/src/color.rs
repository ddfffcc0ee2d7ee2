//! Event color codes.
//!
//! The calendar service identifies event colors by short numeric strings. Codes
//! outside this table are kept as raw strings on [`crate::models::Event::color_id`].

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventColor {
    Lavender,
    Sage,
    Grape,
    Flamingo,
    Banana,
    Tangerine,
    Peacock,
    Graphite,
    Blueberry,
    Basil,
    Tomato,
}

impl EventColor {
    pub const ALL: [EventColor; 11] = [
        EventColor::Lavender,
        EventColor::Sage,
        EventColor::Grape,
        EventColor::Flamingo,
        EventColor::Banana,
        EventColor::Tangerine,
        EventColor::Peacock,
        EventColor::Graphite,
        EventColor::Blueberry,
        EventColor::Basil,
        EventColor::Tomato,
    ];

    /// The wire code for this color.
    pub fn code(self) -> &'static str {
        match self {
            EventColor::Lavender => "1",
            EventColor::Sage => "2",
            EventColor::Grape => "3",
            EventColor::Flamingo => "4",
            EventColor::Banana => "5",
            EventColor::Tangerine => "6",
            EventColor::Peacock => "7",
            EventColor::Graphite => "8",
            EventColor::Blueberry => "9",
            EventColor::Basil => "10",
            EventColor::Tomato => "11",
        }
    }

    /// Looks up a wire code. Returns `None` for codes this table does not know.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.code() == code)
    }
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
