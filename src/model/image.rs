use serde::{Deserialize, Serialize};

use crate::framework::{FetchPolicy, Resource, ResourceKey};

use super::IMAGES_PATH;

/// Image metadata from `/api/Image/{id}`. `path` is a signed URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventImageData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub alt_text: String,
}

impl Resource for EventImageData {
    const BASE_PATH: &'static str = IMAGES_PATH;

    fn policy() -> FetchPolicy {
        FetchPolicy::STABLE
    }

    fn is_usable(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Every image from `/api/Image`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageList(pub Vec<EventImageData>);

impl ImageList {
    pub fn key() -> ResourceKey {
        ResourceKey::collection(IMAGES_PATH)
    }
}

impl Resource for ImageList {
    const BASE_PATH: &'static str = IMAGES_PATH;

    fn policy() -> FetchPolicy {
        FetchPolicy::STABLE
    }

    fn is_usable(&self) -> bool {
        !self.0.is_empty()
    }
}
