use serde::{Deserialize, Serialize};

use crate::framework::{FetchPolicy, Resource};

use super::LOCATIONS_PATH;

/// Street address from `/api/Nexuspoint/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLocationData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub street_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
}

impl EventLocationData {
    pub fn new(
        id: impl Into<String>,
        street_name: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            street_name: street_name.into(),
            city: city.into(),
            state: state.into(),
        }
    }
}

impl Resource for EventLocationData {
    const BASE_PATH: &'static str = LOCATIONS_PATH;

    fn policy() -> FetchPolicy {
        FetchPolicy::STABLE
    }

    fn is_usable(&self) -> bool {
        !self.id.is_empty()
    }
}
