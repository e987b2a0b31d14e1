use crate::framework::Subscription;
use crate::model::EventImageData;
use crate::render::{select, Resolved};

pub const PLACEHOLDER_IMAGE: &str = "/images/Image.svg";

/// Source and accessibility text of one rendered image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub src: String,
    pub alt: String,
    pub title: String,
}

impl Picture {
    pub fn placeholder(alt_text: &str) -> Self {
        Self {
            src: PLACEHOLDER_IMAGE.to_string(),
            alt: format!("Placeholder for {alt_text}"),
            title: "Image Placeholder".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageView {
    Skeleton,
    /// Guard id, failed request, or metadata without a path.
    Placeholder(Picture),
    Image(Picture),
}

pub fn image_view(subscription: &Subscription<EventImageData>, alt_text: &str) -> ImageView {
    let state = subscription.state();
    match select(&state, subscription.should_fetch()) {
        Resolved::Loading => ImageView::Skeleton,
        Resolved::Success(image) => ImageView::Image(Picture {
            src: image.path.clone(),
            alt: image.alt_text.clone(),
            title: image.name.clone(),
        }),
        Resolved::Error(_) | Resolved::Empty => ImageView::Placeholder(Picture::placeholder(alt_text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{ImageClient, ResourceFetcher};
    use crate::framework::mock::MockTransport;
    use crate::framework::{FetchActor, NIL_ID};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn client(transport: Arc<MockTransport>) -> ImageClient {
        let (actor, client) = FetchActor::new(8, transport);
        tokio::spawn(actor.run());
        ImageClient::new(client)
    }

    #[tokio::test]
    async fn test_guard_id_renders_placeholder_without_request() {
        let transport = Arc::new(MockTransport::new());
        let images = client(transport.clone());

        let sub = images.watch(Some(NIL_ID)).await;
        assert_eq!(
            image_view(&sub, "Launch"),
            ImageView::Placeholder(Picture {
                src: "/images/Image.svg".into(),
                alt: "Placeholder for Launch".into(),
                title: "Image Placeholder".into(),
            })
        );
        assert!(transport.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loaded_image_and_pathless_image() {
        let transport = Arc::new(MockTransport::new().with_latency(Duration::from_millis(10)));
        transport.expect_get("/api/Image/i1").return_ok(json!({
            "id": "i1", "name": "Stage", "path": "https://cdn/i1.png", "altText": "A stage"
        }));
        transport
            .expect_get("/api/Image/i2")
            .return_ok(json!({ "id": "i2", "name": "Blank", "path": "" }));
        let images = client(transport);

        let mut first = images.watch(Some("i1")).await;
        assert_eq!(image_view(&first, "x"), ImageView::Skeleton);
        first.settled().await;
        assert_eq!(
            image_view(&first, "x"),
            ImageView::Image(Picture {
                src: "https://cdn/i1.png".into(),
                alt: "A stage".into(),
                title: "Stage".into(),
            })
        );

        let mut second = images.watch(Some("i2")).await;
        second.settled().await;
        assert!(matches!(image_view(&second, "x"), ImageView::Placeholder(_)));
    }
}
