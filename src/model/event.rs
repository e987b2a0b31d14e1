use serde::{Deserialize, Serialize};

use crate::framework::{Resource, ResourceKey};

use super::EVENTS_PATH;

/// An event as served by `/api/events` and `/api/events/{id}`.
///
/// Only `id` and `title` are guaranteed; everything else may be absent or
/// `null` upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub image_id: Option<String>,
    /// Location identifier, resolved through `/api/Nexuspoint/{id}`.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub packages: Option<Vec<EventPackage>>,
}

impl EventData {
    /// Creates a new event with only the required fields set.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_id: None,
            location: None,
            date_time: None,
            price: None,
            description: None,
            packages: None,
        }
    }

    pub fn packages(&self) -> &[EventPackage] {
        self.packages.as_deref().unwrap_or_default()
    }

    pub fn package(&self, package_id: &str) -> Option<&EventPackage> {
        self.packages().iter().find(|p| p.id == package_id)
    }
}

impl Resource for EventData {
    const BASE_PATH: &'static str = EVENTS_PATH;
}

/// Price as sent upstream: usually a number, occasionally a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Label(String),
}

/// A purchasable sign-up option attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPackage {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub perks: Vec<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub currency: String,
}

impl EventPackage {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        price: f64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            perks: Vec::new(),
            price,
            currency: currency.into(),
        }
    }
}

/// The full event collection from `/api/events`.
///
/// An empty list is a successful request with nothing to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventList(pub Vec<EventData>);

impl EventList {
    pub fn key() -> ResourceKey {
        ResourceKey::collection(EVENTS_PATH)
    }
}

impl Resource for EventList {
    const BASE_PATH: &'static str = EVENTS_PATH;

    fn is_usable(&self) -> bool {
        !self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_decodes_with_optional_fields_missing_or_null() {
        let event: EventData = serde_json::from_value(json!({
            "id": "e1",
            "title": "Starcraft Event",
            "imageId": null,
            "price": 100,
        }))
        .unwrap();
        assert_eq!(event.image_id, None);
        assert_eq!(event.price, Some(Price::Amount(100.0)));
        assert!(event.packages().is_empty());
    }

    #[test]
    fn test_textual_price_and_packages_decode() {
        let event: EventData = serde_json::from_value(json!({
            "id": "e2",
            "title": "Meetup",
            "price": "Free",
            "packages": [
                { "id": "p1", "title": "Gold", "perks": ["Front row"], "price": 49.5, "currency": "USD" }
            ],
        }))
        .unwrap();
        assert_eq!(event.price, Some(Price::Label("Free".into())));
        assert_eq!(event.package("p1").map(|p| p.perks.len()), Some(1));
        assert_eq!(event.package("p2"), None);
    }

    #[test]
    fn test_empty_event_list_is_not_usable() {
        assert!(!EventList(vec![]).is_usable());
        assert!(EventList(vec![EventData::new("e1", "A")]).is_usable());
        assert_eq!(EventList::key().as_str(), "/api/events");
    }
}
