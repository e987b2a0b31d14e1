use crate::clients::PortalClients;
use crate::framework::Subscription;
use crate::model::{EventList, EVENTS_PATH};
use crate::render::{select, Resolved};

use super::event_card::{EventCard, EventCardView};

/// Display options of an [`EventGrid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventGridOptions {
    pub endpoint: String,
    pub title: String,
    /// Number of cards shown, and of skeletons while loading.
    pub count: usize,
}

impl Default for EventGridOptions {
    fn default() -> Self {
        Self {
            endpoint: EVENTS_PATH.to_string(),
            title: "Events".to_string(),
            count: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventGridView {
    Loading { title: String, skeletons: usize },
    Error { title: String, message: String },
    Empty { title: String, message: String },
    Loaded { title: String, cards: Vec<EventCardView> },
}

/// Grid of the first `count` events of a collection endpoint.
pub struct EventGrid {
    options: EventGridOptions,
    clients: PortalClients,
    list: Subscription<EventList>,
    cards: Vec<EventCard>,
}

impl EventGrid {
    pub async fn mount(clients: PortalClients, options: EventGridOptions) -> Self {
        let list = clients.events.list_at(&options.endpoint).await;
        Self {
            options,
            clients,
            list,
            cards: Vec::new(),
        }
    }

    /// Re-mounts cards when the displayed events changed.
    pub async fn sync(&mut self) {
        let state = self.list.state();
        let wanted: Vec<_> = state
            .data
            .map(|list| list.0.into_iter().take(self.options.count).collect())
            .unwrap_or_default();

        let unchanged = wanted.len() == self.cards.len()
            && wanted.iter().zip(&self.cards).all(|(e, c)| e == c.event());
        if unchanged {
            return;
        }

        let mut cards = Vec::with_capacity(wanted.len());
        for event in wanted {
            cards.push(EventCard::mount(event, &self.clients).await);
        }
        self.cards = cards;
    }

    /// Waits for the list and every card to finish loading.
    pub async fn settle(&mut self) {
        self.list.settled().await;
        self.sync().await;
        for card in &mut self.cards {
            card.settle().await;
        }
    }

    pub fn render(&self) -> EventGridView {
        let title = self.options.title.clone();
        let state = self.list.state();
        match select(&state, self.list.should_fetch()) {
            Resolved::Loading => EventGridView::Loading {
                title,
                skeletons: self.options.count,
            },
            Resolved::Error(_) => EventGridView::Error {
                title: "Error".to_string(),
                message: format!("Error fetching data from {}", self.options.endpoint),
            },
            Resolved::Empty => EventGridView::Empty {
                title,
                message: "No events found".to_string(),
            },
            Resolved::Success(_) => EventGridView::Loaded {
                title,
                cards: self.cards.iter().map(EventCard::render).collect(),
            },
        }
    }
}
