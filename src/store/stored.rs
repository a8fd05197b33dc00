/// Identifier type assigned by stores. Unique per store instance for the
/// store's lifetime; never reused.
pub type EntityId = u64;

/// Trait for record types that can live in an
/// [`EntityStore`](crate::EntityStore).
///
/// Derivable via `#[derive(Stored)]` from `reelstore_macros`, which picks
/// up a field named `id` (or one marked `#[stored(id)]`) and defaults the
/// store name to the snake_cased type name with an `s` appended.
pub trait Stored: Clone + Send + Sync {
    /// Diagnostic store name (e.g. "users", "films"). Appears in log
    /// fields and internal error messages, never in client messages.
    const STORE: &'static str;

    /// The record's identifier. Meaningless until the store assigns one.
    fn id(&self) -> EntityId;

    /// Called by the store when it allocates an identifier on insert.
    fn assign_id(&mut self, id: EntityId);
}
