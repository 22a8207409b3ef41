use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordering applied client-side to a fetched result set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Popularity,
    RatingDesc,
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    DurationAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 7] = [
        SortOrder::Popularity,
        SortOrder::RatingDesc,
        SortOrder::NameAsc,
        SortOrder::NameDesc,
        SortOrder::PriceAsc,
        SortOrder::PriceDesc,
        SortOrder::DurationAsc,
    ];

    /// The token used by the sort selector.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Popularity => "popularity",
            SortOrder::RatingDesc => "rating-desc",
            SortOrder::NameAsc => "name-asc",
            SortOrder::NameDesc => "name-desc",
            SortOrder::PriceAsc => "price-asc",
            SortOrder::PriceDesc => "price-desc",
            SortOrder::DurationAsc => "duration-asc",
        }
    }

    /// Parses a selector token, returning `None` for anything unknown.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|o| o.as_str() == token.trim())
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the filter inputs, rebuilt on every search.
///
/// Empty sets, a zero rating and an empty term all mean "no constraint".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FilterCriteria {
    #[serde(default)]
    pub continents: BTreeSet<String>,
    #[serde(default)]
    pub price_categories: BTreeSet<String>,
    /// Minimum star rating, 0..=5.
    #[serde(default)]
    pub min_rating: u8,
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub min_duration: Option<u32>,
}

impl FilterCriteria {
    /// True when no field constrains the listing (the sort order is ignored).
    pub fn is_unconstrained(&self) -> bool {
        self.continents.is_empty()
            && self.price_categories.is_empty()
            && self.min_rating == 0
            && self.search_term.trim().is_empty()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_duration.is_none()
    }
}
