//! Photo records attached to places.

use crate::place::PlaceId;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Identifier of a photo, assigned from the store's monotonic counter.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(u64);

impl PhotoId {
    /// Wrap a raw id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Parse from a path segment.
    pub fn parse(s: &str) -> crate::Result<Self> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|e| crate::Error::InvalidId(format!("invalid photo ID '{s}': {e}")))
    }

    /// Get the raw id.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhotoId({})", self.0)
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An uploaded image owned by exactly one place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub place_id: PlaceId,
    /// Generated name of the stored file.
    pub filename: String,
    /// Name supplied by the uploader, for display only.
    #[serde(default)]
    pub original_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_id_parse() {
        assert_eq!(PhotoId::parse("9").unwrap().get(), 9);
        assert!(PhotoId::parse("9.5").is_err());
        assert!(PhotoId::parse("NaN").is_err());
    }

    #[test]
    fn test_photo_wire_format() {
        let photo: Photo = serde_json::from_value(serde_json::json!({
            "id": 4,
            "place_id": 2,
            "filename": "1707904800000-123456789.jpg",
            "original_name": "IMG_0001.JPG",
            "created_at": "2024-02-14T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(photo.id, PhotoId::new(4));
        assert_eq!(photo.place_id, PlaceId::new(2));

        let value = serde_json::to_value(&photo).unwrap();
        assert_eq!(value["place_id"], 2);
        assert_eq!(value["original_name"], "IMG_0001.JPG");
        assert!(value["created_at"].as_str().unwrap().starts_with("2024-02-14T10:00:00"));
    }
}
