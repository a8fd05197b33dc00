use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{ClassifiedError, Layer};

use super::{EntityId, IdAllocator, Stored};

type UniqueKeyFn<E> = dyn Fn(&E) -> Option<String> + Send + Sync;

/// A locked mapping from identifier to entity, shared by concurrent
/// request-handling tasks.
///
/// Reads take the shared lock, writes the exclusive lock; the lock covers
/// the whole store, which serializes writers and blocks readers during
/// writes. Identifier allocation does not go through the lock at all; it
/// is a single atomic increment on the embedded [`IdAllocator`].
///
/// Expected failures (`NotFound`, `AlreadyExists`) come back as
/// [`ClassifiedError`] values, never panics. A poisoned lock is mapped to
/// an `Internal` error for the boundary above to log.
pub struct EntityStore<E: Stored> {
    entities: RwLock<HashMap<EntityId, E>>,
    ids: IdAllocator,
    unique_key: Option<Box<UniqueKeyFn<E>>>,
}

impl<E: Stored> EntityStore<E> {
    /// An empty store with no uniqueness constraint.
    pub fn new() -> Self {
        EntityStore {
            entities: RwLock::new(HashMap::new()),
            ids: IdAllocator::new(),
            unique_key: None,
        }
    }

    /// An empty store that enforces a uniqueness constraint across live
    /// records. The extractor returns a record's unique key, or `None`
    /// for records exempt from the constraint. Key normalization (e.g.
    /// case folding) is the extractor's job.
    pub fn with_unique_key<F>(key: F) -> Self
    where
        F: Fn(&E) -> Option<String> + Send + Sync + 'static,
    {
        EntityStore {
            entities: RwLock::new(HashMap::new()),
            ids: IdAllocator::new(),
            unique_key: Some(Box::new(key)),
        }
    }

    /// Reset the store to a seed state (or empty).
    ///
    /// Clears the mapping, restarts the identifier sequence, and re-adds
    /// the seed records through the normal allocation and uniqueness
    /// path, so seeds get ids 1, 2, ... in order. Intended for startup;
    /// concurrent callers block on the exclusive lock but nothing
    /// coordinates *between* their calls.
    pub fn initialize(&self, seed: Vec<E>) -> Result<(), ClassifiedError> {
        let mut entities = self
            .entities
            .write()
            .map_err(|_| self.poisoned("initialize"))?;
        entities.clear();
        self.ids.reset();
        for entity in seed {
            self.insert_new(&mut entities, entity)?;
        }
        tracing::info!(store = E::STORE, records = entities.len(), "store initialized");
        Ok(())
    }

    /// Store a new record, allocating its identifier.
    ///
    /// Returns the stored copy with the id populated. If the uniqueness
    /// key collides with a live record, returns `AlreadyExists` and the
    /// store is left unchanged (no identifier is consumed).
    pub fn add(&self, entity: E) -> Result<E, ClassifiedError> {
        let mut entities = self.entities.write().map_err(|_| self.poisoned("add"))?;
        let stored = self.insert_new(&mut entities, entity)?;
        tracing::debug!(store = E::STORE, id = stored.id(), "record added");
        Ok(stored)
    }

    /// Fetch a record by id. Side-effect free.
    pub fn get(&self, id: EntityId) -> Result<E, ClassifiedError> {
        let entities = self.entities.read().map_err(|_| self.poisoned("get"))?;
        entities
            .get(&id)
            .cloned()
            .ok_or_else(|| self.not_found(id))
    }

    /// Replace the record stored under an existing id.
    ///
    /// `NotFound` if the id was never stored (or was removed);
    /// `AlreadyExists` if the record's uniqueness key now collides with a
    /// *different* live record. Either way the store is left unchanged.
    pub fn update(&self, entity: E) -> Result<E, ClassifiedError> {
        let mut entities = self
            .entities
            .write()
            .map_err(|_| self.poisoned("update"))?;
        let id = entity.id();
        if !entities.contains_key(&id) {
            return Err(self.not_found(id));
        }
        if let Some(key_fn) = self.unique_key.as_deref() {
            if let Some(key) = key_fn(&entity) {
                let collides = entities.iter().any(|(other_id, existing)| {
                    *other_id != id && key_fn(existing).as_deref() == Some(key.as_str())
                });
                if collides {
                    return Err(self.duplicate_key(&key));
                }
            }
        }
        entities.insert(id, entity.clone());
        tracing::debug!(store = E::STORE, id, "record updated");
        Ok(entity)
    }

    /// Remove and return a record. `NotFound` if absent. The identifier
    /// is retired, not reissued.
    pub fn remove(&self, id: EntityId) -> Result<E, ClassifiedError> {
        let mut entities = self
            .entities
            .write()
            .map_err(|_| self.poisoned("remove"))?;
        let removed = entities.remove(&id).ok_or_else(|| self.not_found(id))?;
        tracing::debug!(store = E::STORE, id, "record removed");
        Ok(removed)
    }

    /// All records matching the predicate, via a linear scan under the
    /// shared lock.
    ///
    /// An empty result is reported as `NotFound` rather than an empty
    /// success. Callers that need to distinguish a legitimate zero-match
    /// case use [`EntityStore::find_first`] or [`EntityStore::all`]
    /// instead.
    pub fn filter<F>(&self, predicate: F) -> Result<Vec<E>, ClassifiedError>
    where
        F: Fn(&E) -> bool,
    {
        let entities = self.entities.read().map_err(|_| self.poisoned("filter"))?;
        let matched: Vec<E> = entities
            .values()
            .filter(|entity| predicate(entity))
            .cloned()
            .collect();
        if matched.is_empty() {
            return Err(ClassifiedError::not_found(
                Layer::Storage,
                format!("no matching records in {}", E::STORE),
            ));
        }
        Ok(matched)
    }

    /// A record matching the predicate, if any. Absence is not an error
    /// here. Intended for unique secondary keys; with multiple matches
    /// the choice is arbitrary.
    pub fn find_first<F>(&self, predicate: F) -> Result<Option<E>, ClassifiedError>
    where
        F: Fn(&E) -> bool,
    {
        let entities = self
            .entities
            .read()
            .map_err(|_| self.poisoned("find_first"))?;
        Ok(entities.values().find(|entity| predicate(entity)).cloned())
    }

    /// A full copy of the store, stable-sorted ascending by the extracted
    /// key. An empty store yields an empty vector, not an error.
    pub fn sorted_by<K, F>(&self, key: F) -> Result<Vec<E>, ClassifiedError>
    where
        K: Ord,
        F: Fn(&E) -> K,
    {
        let entities = self
            .entities
            .read()
            .map_err(|_| self.poisoned("sorted_by"))?;
        let mut all: Vec<E> = entities.values().cloned().collect();
        all.sort_by_key(|entity| key(entity));
        Ok(all)
    }

    /// Every record, in no particular order.
    pub fn all(&self) -> Result<Vec<E>, ClassifiedError> {
        let entities = self.entities.read().map_err(|_| self.poisoned("all"))?;
        Ok(entities.values().cloned().collect())
    }

    pub fn len(&self) -> Result<usize, ClassifiedError> {
        let entities = self.entities.read().map_err(|_| self.poisoned("len"))?;
        Ok(entities.len())
    }

    pub fn is_empty(&self) -> Result<bool, ClassifiedError> {
        Ok(self.len()? == 0)
    }

    // Uniqueness check + id allocation + insert, under an already-held
    // write lock. Shared by add and initialize.
    fn insert_new(
        &self,
        entities: &mut HashMap<EntityId, E>,
        mut entity: E,
    ) -> Result<E, ClassifiedError> {
        if let Some(key_fn) = self.unique_key.as_deref() {
            if let Some(key) = key_fn(&entity) {
                let taken = entities
                    .values()
                    .any(|existing| key_fn(existing).as_deref() == Some(key.as_str()));
                if taken {
                    tracing::warn!(store = E::STORE, "uniqueness violation on insert");
                    return Err(self.duplicate_key(&key));
                }
            }
        }
        let id = self.ids.next_id();
        entity.assign_id(id);
        entities.insert(id, entity.clone());
        Ok(entity)
    }

    fn not_found(&self, id: EntityId) -> ClassifiedError {
        ClassifiedError::not_found(Layer::Storage, format!("record {} not found", id))
            .with_internal(format!("{} store: id {} absent", E::STORE, id))
    }

    fn duplicate_key(&self, key: &str) -> ClassifiedError {
        ClassifiedError::already_exists(
            Layer::Storage,
            "a record with the same unique key already exists",
        )
        .with_internal(format!("{} store: duplicate key {}", E::STORE, key))
    }

    fn poisoned(&self, op: &'static str) -> ClassifiedError {
        ClassifiedError::internal(
            Layer::Storage,
            format!("{} store lock poisoned during {}", E::STORE, op),
        )
    }
}

impl<E: Stored> Default for EntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{is, Kind};

    use super::*;

    #[derive(Clone, Debug, PartialEq, reelstore_macros::Stored)]
    #[stored(store = "scratch_notes")]
    struct Note {
        id: EntityId,
        body: String,
        tag: String,
    }

    fn note(body: &str, tag: &str) -> Note {
        Note {
            id: 0,
            body: body.to_string(),
            tag: tag.to_string(),
        }
    }

    fn keyed_store() -> EntityStore<Note> {
        EntityStore::with_unique_key(|n: &Note| Some(n.body.to_lowercase()))
    }

    #[test]
    fn add_assigns_sequential_ids() {
        let store = EntityStore::new();
        let first = store.add(note("a", "x")).unwrap();
        let second = store.add(note("b", "x")).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn add_then_get_roundtrips() {
        let store = EntityStore::new();
        let stored = store.add(note("buy milk", "errand")).unwrap();
        let fetched = store.get(stored.id).unwrap();
        assert_eq!(fetched, stored);
        assert_eq!(fetched.body, "buy milk");
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let store: EntityStore<Note> = EntityStore::new();
        let err = store.get(42).unwrap_err();
        assert!(is(&err, Kind::NotFound));
        assert!(err.client_message().unwrap().contains("42"));
    }

    #[test]
    fn duplicate_unique_key_rejected_and_store_unchanged() {
        let store = keyed_store();
        store.add(note("Same", "first")).unwrap();
        let err = store.add(note("same", "second")).unwrap_err();
        assert!(is(&err, Kind::AlreadyExists));
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get(1).unwrap().tag, "first");
        // the failed add must not burn an identifier
        let next = store.add(note("other", "third")).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn update_replaces_existing_record() {
        let store = EntityStore::new();
        let mut stored = store.add(note("a", "old")).unwrap();
        stored.tag = "new".to_string();
        store.update(stored.clone()).unwrap();
        assert_eq!(store.get(stored.id).unwrap().tag, "new");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn update_absent_id_is_not_found() {
        let store = EntityStore::new();
        let mut ghost = note("a", "x");
        ghost.id = 99;
        let err = store.update(ghost).unwrap_err();
        assert!(is(&err, Kind::NotFound));
    }

    #[test]
    fn update_may_keep_its_own_unique_key() {
        let store = keyed_store();
        let mut stored = store.add(note("same", "old")).unwrap();
        stored.tag = "new".to_string();
        // no collision with itself
        store.update(stored).unwrap();
        assert_eq!(store.get(1).unwrap().tag, "new");
    }

    #[test]
    fn update_colliding_with_other_record_rejected() {
        let store = keyed_store();
        store.add(note("first", "a")).unwrap();
        let mut second = store.add(note("second", "b")).unwrap();
        second.body = "FIRST".to_string();
        let err = store.update(second).unwrap_err();
        assert!(is(&err, Kind::AlreadyExists));
        assert_eq!(store.get(2).unwrap().body, "second");
    }

    #[test]
    fn remove_then_get_is_not_found_and_id_not_reused() {
        let store = EntityStore::new();
        let stored = store.add(note("a", "x")).unwrap();
        let removed = store.remove(stored.id).unwrap();
        assert_eq!(removed, stored);
        assert!(is(&store.get(stored.id).unwrap_err(), Kind::NotFound));
        let next = store.add(note("b", "x")).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn remove_absent_id_is_not_found() {
        let store: EntityStore<Note> = EntityStore::new();
        assert!(is(&store.remove(7).unwrap_err(), Kind::NotFound));
    }

    #[test]
    fn filter_returns_exact_matching_subset() {
        let store = EntityStore::new();
        store.add(note("a", "keep")).unwrap();
        store.add(note("b", "drop")).unwrap();
        store.add(note("c", "keep")).unwrap();
        let kept = store.filter(|n| n.tag == "keep").unwrap();
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|n| n.tag == "keep"));
    }

    #[test]
    fn filter_with_no_matches_is_not_found() {
        let store = EntityStore::new();
        store.add(note("a", "x")).unwrap();
        let err = store.filter(|n| n.tag == "missing").unwrap_err();
        assert!(is(&err, Kind::NotFound));
    }

    #[test]
    fn find_first_absence_is_not_an_error() {
        let store = EntityStore::new();
        store.add(note("a", "x")).unwrap();
        assert!(store.find_first(|n| n.tag == "x").unwrap().is_some());
        assert!(store.find_first(|n| n.tag == "y").unwrap().is_none());
    }

    #[test]
    fn sorted_by_orders_ascending_and_tolerates_empty() {
        let store = EntityStore::new();
        assert!(store.sorted_by(|n: &Note| n.body.clone()).unwrap().is_empty());
        store.add(note("c", "x")).unwrap();
        store.add(note("a", "x")).unwrap();
        store.add(note("b", "x")).unwrap();
        let ordered = store.sorted_by(|n| n.body.clone()).unwrap();
        let bodies: Vec<_> = ordered.iter().map(|n| n.body.as_str()).collect();
        assert_eq!(bodies, ["a", "b", "c"]);
    }

    #[test]
    fn initialize_resets_records_and_id_sequence() {
        let store = EntityStore::new();
        store.add(note("old", "x")).unwrap();
        store.add(note("older", "x")).unwrap();

        store.initialize(vec![note("seed1", "s"), note("seed2", "s")]).unwrap();

        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(store.get(1).unwrap().body, "seed1");
        assert_eq!(store.get(2).unwrap().body, "seed2");
        assert!(is(&store.get(3).unwrap_err(), Kind::NotFound));
    }

    #[test]
    fn initialize_empty_clears_everything() {
        let store = EntityStore::new();
        store.add(note("a", "x")).unwrap();
        store.initialize(Vec::new()).unwrap();
        assert!(store.is_empty().unwrap());
        assert_eq!(store.add(note("b", "x")).unwrap().id, 1);
    }

    #[test]
    fn derive_defaults_store_name_from_type() {
        #[derive(Clone, reelstore_macros::Stored)]
        struct Reel {
            id: EntityId,
        }
        assert_eq!(<Reel as Stored>::STORE, "reels");
        assert_eq!(<Note as Stored>::STORE, "scratch_notes");
        let _ = Reel { id: 0 };
    }
}
