use tracing::debug;

use crate::clients::{PortalClients, ResourceFetcher};
use crate::framework::Subscription;
use crate::model::{EventData, EventImageData, EventLocationData};

use super::format::{format_date, format_price};
use super::image::{image_view, ImageView};
use super::location::{location_view, LocationView};

/// One event in a grid, with its own image and location subscriptions.
pub struct EventCard {
    event: EventData,
    image: Subscription<EventImageData>,
    location: Subscription<EventLocationData>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCardView {
    pub event_id: String,
    pub title: String,
    pub date: String,
    pub price: String,
    pub image: ImageView,
    pub location: LocationView,
}

impl EventCard {
    pub async fn mount(event: EventData, clients: &PortalClients) -> Self {
        debug!(event_id = %event.id, "Mounting card");
        let (image, location) = tokio::join!(
            clients.images.watch(event.image_id.as_deref()),
            clients.locations.watch(event.location.as_deref()),
        );
        Self {
            event,
            image,
            location,
        }
    }

    pub fn event(&self) -> &EventData {
        &self.event
    }

    /// Waits for the image and location requests to finish.
    pub async fn settle(&mut self) {
        tokio::join!(self.image.settled(), self.location.settled());
    }

    pub fn render(&self) -> EventCardView {
        EventCardView {
            event_id: self.event.id.clone(),
            title: self.event.title.clone(),
            date: format_date(self.event.date_time.as_deref()),
            price: format_price(self.event.price.as_ref()),
            image: image_view(&self.image, &self.event.title),
            location: location_view(&self.location),
        }
    }
}
