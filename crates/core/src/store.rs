//! The `Store` aggregate: every place, every photo and the id counters.
//!
//! All operations here are pure in-memory mutations. Loading and saving the
//! aggregate is the job of a metadata backend; removing photo files is the job
//! of the caller, which receives the removed records.

use crate::error::{Error, Result};
use crate::photo::{Photo, PhotoId};
use crate::place::{NewPlace, Place, PlaceId, PlacePatch, PlaceWithPhotos};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

fn first_id() -> u64 {
    1
}

/// The full persisted dataset.
///
/// Invariant: ids are never reused. Counters only increase, and allocation
/// always moves past the largest id present so a hand-edited document with a
/// stale counter cannot hand out a duplicate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(default)]
    pub places: Vec<Place>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default = "first_id")]
    pub next_place_id: u64,
    #[serde(default = "first_id")]
    pub next_photo_id: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// A place removed by [`Store::remove_place`] together with its cascaded photos.
#[derive(Clone, Debug)]
pub struct RemovedPlace {
    pub place: Place,
    pub photos: Vec<Photo>,
}

impl Store {
    /// An empty store whose first ids will be 1.
    pub fn new() -> Self {
        Self {
            places: Vec::new(),
            photos: Vec::new(),
            next_place_id: first_id(),
            next_photo_id: first_id(),
        }
    }

    fn allocate_photo_id(&mut self) -> Result<PhotoId> {
        let id = free_id(self.next_photo_id, self.photos.iter().map(|p| p.id.get()), "photo")?;
        self.next_photo_id = id.checked_add(1).ok_or(Error::IdsExhausted("photo"))?;
        Ok(PhotoId::new(id))
    }

    /// Whether a place with this id exists.
    pub fn contains_place(&self, id: PlaceId) -> bool {
        self.places.iter().any(|p| p.id == id)
    }

    /// Photos attached to a place, in stored order.
    pub fn photos_for(&self, place_id: PlaceId) -> Vec<Photo> {
        self.photos
            .iter()
            .filter(|p| p.place_id == place_id)
            .cloned()
            .collect()
    }

    fn with_photos(&self, place: &Place) -> PlaceWithPhotos {
        PlaceWithPhotos {
            place: place.clone(),
            photos: self.photos_for(place.id),
        }
    }

    /// Every place with its photos, ordered by `(sort_order, id)`.
    pub fn list_places(&self) -> Vec<PlaceWithPhotos> {
        let mut places: Vec<&Place> = self.places.iter().collect();
        places.sort_by_key(|p| (p.sort_order, p.id));
        places.into_iter().map(|p| self.with_photos(p)).collect()
    }

    /// One place with its photos.
    pub fn get_place(&self, id: PlaceId) -> Result<PlaceWithPhotos> {
        self.places
            .iter()
            .find(|p| p.id == id)
            .map(|p| self.with_photos(p))
            .ok_or(Error::PlaceNotFound(id))
    }

    /// Validate and insert a new place, returning it with an empty photo list.
    ///
    /// The id counter is only advanced when validation succeeds.
    pub fn create_place(
        &mut self,
        new: NewPlace,
        created_at: OffsetDateTime,
    ) -> Result<PlaceWithPhotos> {
        let id = free_id(self.next_place_id, self.places.iter().map(|p| p.id.get()), "place")?;
        let next = id.checked_add(1).ok_or(Error::IdsExhausted("place"))?;
        let place = new.require(PlaceId::new(id), created_at)?;

        self.next_place_id = next;
        self.places.push(place.clone());

        Ok(PlaceWithPhotos {
            place,
            photos: Vec::new(),
        })
    }

    /// Apply a partial update to a place.
    pub fn update_place(&mut self, id: PlaceId, patch: &PlacePatch) -> Result<PlaceWithPhotos> {
        let place = self
            .places
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::PlaceNotFound(id))?;
        patch.apply(place);
        let updated = place.clone();
        Ok(self.with_photos(&updated))
    }

    /// Remove a place and every photo that references it.
    pub fn remove_place(&mut self, id: PlaceId) -> Result<RemovedPlace> {
        let index = self
            .places
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::PlaceNotFound(id))?;

        let (photos, kept): (Vec<Photo>, Vec<Photo>) = std::mem::take(&mut self.photos)
            .into_iter()
            .partition(|p| p.place_id == id);
        self.photos = kept;
        let place = self.places.remove(index);

        Ok(RemovedPlace { place, photos })
    }

    /// Record a stored file as a new photo of an existing place.
    pub fn add_photo(
        &mut self,
        place_id: PlaceId,
        filename: impl Into<String>,
        original_name: impl Into<String>,
        created_at: OffsetDateTime,
    ) -> Result<Photo> {
        if !self.contains_place(place_id) {
            return Err(Error::PlaceNotFound(place_id));
        }

        let photo = Photo {
            id: self.allocate_photo_id()?,
            place_id,
            filename: filename.into(),
            original_name: original_name.into(),
            created_at,
        };
        self.photos.push(photo.clone());
        Ok(photo)
    }

    /// Remove a single photo record.
    pub fn remove_photo(&mut self, id: PhotoId) -> Result<Photo> {
        let index = self
            .photos
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::PhotoNotFound(id))?;
        Ok(self.photos.remove(index))
    }
}

/// Smallest id that is at least `counter` (and at least 1) and above every id
/// in use.
fn free_id(counter: u64, used: impl Iterator<Item = u64>, kind: &'static str) -> Result<u64> {
    let mut id = counter.max(1);
    for used in used {
        if used >= id {
            id = used.checked_add(1).ok_or(Error::IdsExhausted(kind))?;
        }
    }
    Ok(id)
}
