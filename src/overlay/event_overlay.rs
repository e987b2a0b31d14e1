use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::clients::{PortalClients, ResourceFetcher};
use crate::framework::Subscription;
use crate::model::{EventData, EventImageData, EventLocationData};
use crate::render::{select, Resolved};
use crate::signup::{SignupContext, SignupFlow, SignupView, SubmitOutcome};
use crate::views::{format_date, format_price, image_view, location_view, ImageView, LocationView};

use super::controller::{OverlayController, OverlayPhase};
use super::Navigator;

/// Title and description of a non-detail overlay body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub title: String,
    pub description: String,
}

impl Panel {
    fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetailView {
    pub title: String,
    /// Absent when the event has no date at all.
    pub date: Option<String>,
    pub image: ImageView,
    pub location: LocationView,
    pub description: String,
    pub price: String,
    pub signup: SignupView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayBody {
    /// The route carried no event id; nothing was fetched.
    MissingParameter(Panel),
    Loading(Panel),
    Error(Panel),
    NotFound(Panel),
    Event(Box<EventDetailView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayView {
    pub open: bool,
    pub body: OverlayBody,
}

/// The event detail overlay: one event, its image and location, and the
/// sign-up sub-flow.
pub struct EventOverlay {
    controller: OverlayController,
    clients: PortalClients,
    event_id: Option<String>,
    event: Subscription<EventData>,
    image: Subscription<EventImageData>,
    location: Subscription<EventLocationData>,
    nested_for: Option<(Option<String>, Option<String>)>,
    signup: SignupFlow,
}

impl EventOverlay {
    /// Mounts an open overlay for the `event_id` route parameter.
    pub async fn mount(
        event_id: Option<&str>,
        clients: PortalClients,
        navigator: Arc<dyn Navigator>,
        close_delay: Duration,
    ) -> Self {
        let event_id = event_id.filter(|id| !id.is_empty()).map(str::to_string);
        let event = match &event_id {
            Some(id) => clients.events.watch(Some(id.as_str())).await,
            None => {
                debug!("Overlay mounted without an event id");
                Subscription::idle()
            }
        };
        Self {
            controller: OverlayController::open(navigator, close_delay),
            clients,
            event_id,
            event,
            image: Subscription::idle(),
            location: Subscription::idle(),
            nested_for: None,
            signup: SignupFlow::new(),
        }
    }

    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn phase(&self) -> OverlayPhase {
        self.controller.phase()
    }

    pub fn signup(&self) -> &SignupFlow {
        &self.signup
    }

    /// Mounts or swaps the image and location subscriptions for the current event.
    pub async fn sync(&mut self) {
        let wanted = self
            .event
            .state()
            .data
            .map(|event| (event.image_id, event.location));
        if wanted == self.nested_for {
            return;
        }

        match &wanted {
            Some((image_id, location_id)) => {
                let (image, location) = tokio::join!(
                    self.clients.images.watch(image_id.as_deref()),
                    self.clients.locations.watch(location_id.as_deref()),
                );
                self.image = image;
                self.location = location;
            }
            None => {
                self.image = Subscription::idle();
                self.location = Subscription::idle();
            }
        }
        self.nested_for = wanted;
    }

    /// Waits for the event and its nested resources to finish loading.
    pub async fn settle(&mut self) {
        self.event.settled().await;
        self.sync().await;
        tokio::join!(self.image.settled(), self.location.settled());
    }

    /// Hides the overlay, resets the sub-flow and schedules the navigation.
    pub fn request_close(&mut self) -> bool {
        if !self.controller.is_open() {
            return false;
        }
        self.signup.reset();
        self.controller.request_close()
    }

    pub fn on_open_change(&mut self, open: bool) -> bool {
        if open {
            return false;
        }
        self.request_close()
    }

    pub async fn closed(&self) {
        self.controller.closed().await;
    }

    /// Chooses the package with `package_id` from the loaded event.
    pub fn select_package(&mut self, package_id: &str) -> bool {
        let Some(package) = self
            .event
            .state()
            .data
            .and_then(|event| event.package(package_id).cloned())
        else {
            return false;
        };
        self.signup.select(package)
    }

    pub fn go_back(&mut self) -> bool {
        self.signup.go_back()
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.signup.set_email(email);
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let context = self.signup_context();
        self.signup.submit(&context, &self.clients.mail).await
    }

    fn signup_context(&self) -> SignupContext {
        SignupContext {
            event_id: self.event_id.clone().unwrap_or_default(),
            event_name: self.event.state().data.map(|event| event.title),
        }
    }

    pub fn render(&self) -> OverlayView {
        OverlayView {
            open: self.controller.is_open(),
            body: self.render_body(),
        }
    }

    fn render_body(&self) -> OverlayBody {
        if self.event_id.is_none() {
            return OverlayBody::MissingParameter(Panel::new("Error", "Event ID is missing."));
        }

        let state = self.event.state();
        match select(&state, self.event.should_fetch()) {
            Resolved::Loading => OverlayBody::Loading(Panel::new(
                "Getting event details...",
                "Please wait while we are getting the event details.",
            )),
            Resolved::Error(_) => OverlayBody::Error(Panel::new(
                "Error",
                "Failed to load event details. Please try again later.",
            )),
            Resolved::Empty => OverlayBody::NotFound(Panel::new(
                "Event Not Found",
                "The requested event could not be found.",
            )),
            Resolved::Success(event) => OverlayBody::Event(Box::new(self.render_event(event))),
        }
    }

    fn render_event(&self, event: &EventData) -> EventDetailView {
        let title = Some(event.title.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or("Event Details");
        let description = event
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("No description available.");
        EventDetailView {
            title: title.to_string(),
            date: event
                .date_time
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(|d| format_date(Some(d))),
            image: image_view(&self.image, &event.title),
            location: location_view(&self.location),
            description: description.to_string(),
            price: format!("Price: {}", format_price(event.price.as_ref())),
            signup: self.signup.view(event.packages()),
        }
    }
}
