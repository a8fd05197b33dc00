use crate::error::ClassifiedError;
use crate::store::{EntityId, EntityStore};

use super::{Film, Genre};

/// Typed store for the film catalog.
///
/// No uniqueness constraint: the catalog may legitimately hold two films
/// with the same title. Constructed once at startup and shared by
/// reference with every consumer.
pub struct FilmStore {
    inner: EntityStore<Film>,
}

impl FilmStore {
    pub fn new() -> Self {
        FilmStore {
            inner: EntityStore::new(),
        }
    }

    /// Reset to a seed state (or empty). Startup only.
    pub fn initialize(&self, seed: Vec<Film>) -> Result<(), ClassifiedError> {
        self.inner.initialize(seed)
    }

    /// Add a film to the catalog, allocating its identifier.
    pub fn add(&self, film: Film) -> Result<Film, ClassifiedError> {
        self.inner.add(film)
    }

    pub fn get(&self, id: EntityId) -> Result<Film, ClassifiedError> {
        self.inner.get(id)
    }

    pub fn update(&self, film: Film) -> Result<Film, ClassifiedError> {
        self.inner.update(film)
    }

    pub fn remove(&self, id: EntityId) -> Result<Film, ClassifiedError> {
        self.inner.remove(id)
    }

    /// Every film whose genre set contains `genre`.
    ///
    /// Follows the store-wide convention that an empty match reports
    /// `NotFound`; browse endpoints above decide whether to translate
    /// that into an empty page.
    pub fn by_genre(&self, genre: Genre) -> Result<Vec<Film>, ClassifiedError> {
        self.inner.filter(move |film| film.genres.contains(&genre))
    }

    /// The whole catalog ordered by release date, oldest first.
    pub fn by_release_date(&self) -> Result<Vec<Film>, ClassifiedError> {
        self.inner.sorted_by(|film| film.release_date)
    }

    pub fn all(&self) -> Result<Vec<Film>, ClassifiedError> {
        self.inner.all()
    }

    pub fn len(&self) -> Result<usize, ClassifiedError> {
        self.inner.len()
    }

    pub fn is_empty(&self) -> Result<bool, ClassifiedError> {
        self.inner.is_empty()
    }
}

impl Default for FilmStore {
    fn default() -> Self {
        Self::new()
    }
}
