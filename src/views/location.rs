use crate::framework::Subscription;
use crate::model::EventLocationData;
use crate::render::{select, Resolved};

pub const LOCATION_UNAVAILABLE: &str = "Could not load location";
const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationView {
    Skeleton,
    Unavailable,
    Resolved {
        label: String,
        /// Map search link for the address.
        maps_url: String,
    },
}

impl LocationView {
    /// Text shown in place of the view.
    pub fn text(&self) -> &str {
        match self {
            LocationView::Skeleton => "",
            LocationView::Unavailable => LOCATION_UNAVAILABLE,
            LocationView::Resolved { label, .. } => label,
        }
    }
}

pub fn location_view(subscription: &Subscription<EventLocationData>) -> LocationView {
    let state = subscription.state();
    match select(&state, subscription.should_fetch()) {
        Resolved::Loading => LocationView::Skeleton,
        Resolved::Success(location) => LocationView::Resolved {
            label: format!(
                "{} , {} , {}",
                location.street_name, location.city, location.state
            ),
            maps_url: maps_url(location),
        },
        Resolved::Error(_) | Resolved::Empty => LocationView::Unavailable,
    }
}

pub fn maps_url(location: &EventLocationData) -> String {
    let query = format!(
        "{}, {}, {}",
        location.street_name, location.city, location.state
    );
    format!("{MAPS_SEARCH_URL}?api=1&query={}", encode_uri_component(&query))
}

/// Percent-encodes every byte outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
fn encode_uri_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(char::from(b)),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
