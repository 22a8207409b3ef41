use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque item identifier.
///
/// The backend sends integer ids, older payloads and storage use strings.
/// Both forms are normalised to the string form, which is what favorites are
/// compared against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => ItemId(s),
            RawId::Int(n) => ItemId(n.to_string()),
            RawId::Float(f) => ItemId(f.to_string()),
        })
    }
}

/// Geographic position of a destination.
///
/// The backend sends a free-form map, so either component may be absent.
/// An absent component reads as 0, which the map treats as "no position".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Coordinates {
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
}

/// A destination as returned by `GET /destinations`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub continent: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub price_category: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub activities: Option<Vec<String>>,
}

/// A travel package as returned by `GET /packages/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Package {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Length of the trip in days.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub old_price: Option<f64>,
    #[serde(default)]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub is_promoted: bool,
    #[serde(default)]
    pub destinations: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub included_services: Option<Vec<String>>,
}

/// Which listing endpoint an item belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Destination,
    Package,
}

impl ItemKind {
    /// Listing endpoint path, relative to the API base.
    pub fn listing_path(&self) -> &'static str {
        match self {
            ItemKind::Destination => "/destinations",
            ItemKind::Package => "/packages/",
        }
    }

    /// Detail page the card links to.
    pub fn detail_page(&self) -> &'static str {
        match self {
            ItemKind::Destination => "destination-detail.html",
            ItemKind::Package => "package-detail.html",
        }
    }

    /// Unfiltered listing page, used by error and empty panels.
    pub fn listing_page(&self) -> &'static str {
        match self {
            ItemKind::Destination => "destinations.html",
            ItemKind::Package => "packages.html",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Destination => "destination",
            ItemKind::Package => "package",
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "destination" | "destinations" => Ok(ItemKind::Destination),
            "package" | "packages" => Ok(ItemKind::Package),
            other => Err(format!("unknown item kind: {}", other)),
        }
    }
}

/// A destination or a package, rendered through the same pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingItem {
    Destination(Destination),
    Package(Package),
}

impl ListingItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            ListingItem::Destination(_) => ItemKind::Destination,
            ListingItem::Package(_) => ItemKind::Package,
        }
    }

    pub fn id(&self) -> &ItemId {
        match self {
            ListingItem::Destination(d) => &d.id,
            ListingItem::Package(p) => &p.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ListingItem::Destination(d) => &d.name,
            ListingItem::Package(p) => &p.name,
        }
    }

    /// Rating out of 5. Packages carry no rating and report 0.
    pub fn rating(&self) -> f64 {
        match self {
            ListingItem::Destination(d) => d.rating,
            ListingItem::Package(_) => 0.0,
        }
    }

    pub fn price(&self) -> Option<f64> {
        match self {
            ListingItem::Destination(_) => None,
            ListingItem::Package(p) => Some(p.price),
        }
    }

    pub fn duration(&self) -> Option<u32> {
        match self {
            ListingItem::Destination(_) => None,
            ListingItem::Package(p) => Some(p.duration),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            ListingItem::Destination(d) => d.description.as_deref(),
            ListingItem::Package(p) => p.description.as_deref(),
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            ListingItem::Destination(d) => d.image_url.as_deref(),
            ListingItem::Package(p) => p.image_url.as_deref(),
        }
    }
}

impl From<Destination> for ListingItem {
    fn from(d: Destination) -> Self {
        ListingItem::Destination(d)
    }
}

impl From<Package> for ListingItem {
    fn from(p: Package) -> Self {
        ListingItem::Package(p)
    }
}
