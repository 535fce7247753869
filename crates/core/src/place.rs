//! Place records and the request shapes that create and update them.

use crate::photo::Photo;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Identifier of a place, assigned from the store's monotonic counter.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(u64);

impl PlaceId {
    /// Wrap a raw id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Parse from a path segment.
    pub fn parse(s: &str) -> crate::Result<Self> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|e| crate::Error::InvalidId(format!("invalid place ID '{s}': {e}")))
    }

    /// Get the raw id.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlaceId({})", self.0)
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A visited location with coordinates and descriptive metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub address: String,
    /// Free text, empty when not provided.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(deserialize_with = "loose_f64")]
    pub latitude: f64,
    #[serde(deserialize_with = "loose_f64")]
    pub longitude: f64,
    /// Free-form date string as typed in the admin form, empty when not provided.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date_visited: String,
    /// Blank or `null` in older documents reads as 0.
    #[serde(default, deserialize_with = "loose_sort_order")]
    pub sort_order: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A place annotated with its photos, as returned by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaceWithPhotos {
    #[serde(flatten)]
    pub place: Place,
    pub photos: Vec<Photo>,
}

/// Fields accepted when creating a place.
///
/// Every field is optional at the wire level so that missing required fields
/// are reported together by [`NewPlace::require`] instead of failing JSON
/// decoding one field at a time.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewPlace {
    pub name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "loose_f64_opt")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64_opt")]
    pub longitude: Option<f64>,
    pub date_visited: Option<String>,
    #[serde(default, deserialize_with = "loose_i64_opt")]
    pub sort_order: Option<i64>,
}

impl NewPlace {
    /// Build the place record, checking that name, address, latitude and
    /// longitude are all present. Name and address must also be non-empty.
    pub fn require(self, id: PlaceId, created_at: OffsetDateTime) -> crate::Result<Place> {
        let name = self.name.filter(|s| !s.is_empty());
        let address = self.address.filter(|s| !s.is_empty());

        match (name, address, self.latitude, self.longitude) {
            (Some(name), Some(address), Some(latitude), Some(longitude)) => Ok(Place {
                id,
                name,
                address,
                description: self.description.unwrap_or_default(),
                latitude,
                longitude,
                date_visited: self.date_visited.unwrap_or_default(),
                sort_order: self.sort_order.unwrap_or(0),
                created_at,
            }),
            _ => Err(crate::Error::MissingFields(
                "name, address, latitude, longitude".to_string(),
            )),
        }
    }
}

/// Partial update of a place.
///
/// The fields do not all follow the same rule:
/// - `name` and `address` only overwrite when present and non-empty.
/// - `description` and `date_visited` overwrite whenever the key is present,
///   so `""` clears them. An explicit `null` clears them as well.
/// - `latitude`, `longitude` and `sort_order` overwrite when present and not null.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlacePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "loose_f64_opt")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64_opt")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    pub date_visited: Option<Option<String>>,
    #[serde(default, deserialize_with = "loose_i64_opt")]
    pub sort_order: Option<i64>,
}

impl PlacePatch {
    /// Apply the provided fields to `place`, leaving the others untouched.
    pub fn apply(&self, place: &mut Place) {
        if let Some(name) = self.name.as_ref().filter(|s| !s.is_empty()) {
            place.name = name.clone();
        }
        if let Some(address) = self.address.as_ref().filter(|s| !s.is_empty()) {
            place.address = address.clone();
        }
        if let Some(description) = &self.description {
            place.description = description.clone().unwrap_or_default();
        }
        if let Some(latitude) = self.latitude {
            place.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            place.longitude = longitude;
        }
        if let Some(date_visited) = &self.date_visited {
            place.date_visited = date_visited.clone().unwrap_or_default();
        }
        if let Some(sort_order) = self.sort_order {
            place.sort_order = sort_order;
        }
    }
}

/// Distinguish a key that is present (possibly `null`) from a missing one.
/// Combined with `#[serde(default)]`, a missing key stays `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A numeric field as the admin form may send it: a JSON number or a numeric
/// string. Documents written by earlier versions keep whichever was sent.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LooseNumber {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        let value = match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("not a number: {s:?}")))?,
        };
        if !value.is_finite() {
            return Err(E::custom("number must be finite"));
        }
        Ok(value)
    }

    /// Fractional values are truncated toward zero.
    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
        if let Self::Int(i) = self {
            return Ok(i);
        }
        if let Self::Text(s) = &self
            && let Ok(i) = s.trim().parse::<i64>()
        {
            return Ok(i);
        }
        self.into_f64().map(|f| f.trunc() as i64)
    }
}

fn loose_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    LooseNumber::deserialize(deserializer)?.into_f64()
}

fn loose_f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<LooseNumber>::deserialize(deserializer)?
        .map(LooseNumber::into_f64)
        .transpose()
}

fn loose_i64_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<LooseNumber>::deserialize(deserializer)?
        .map(LooseNumber::into_i64)
        .transpose()
}

fn loose_sort_order<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<LooseNumber>::deserialize(deserializer)? {
        None => Ok(0),
        Some(LooseNumber::Text(s)) if s.trim().is_empty() => Ok(0),
        Some(n) => n.into_i64(),
    }
}
