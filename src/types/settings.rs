use serde::{Deserialize, Serialize};

use super::filter::SortOrder;

/// Top-level client settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClientSettings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub listing: ListingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the backend lives and how long a listing request may take.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Listing page behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingSettings {
    pub page_size: usize,
    pub default_sort: SortOrder,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            page_size: 9,
            default_sort: SortOrder::Popularity,
        }
    }
}

/// Log filter directive handed to the subscriber (e.g. `info`, `travelgo=debug`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
