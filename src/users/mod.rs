//! User accounts and their store.

mod store;

pub use store::UserStore;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::EntityId;

/// A user account record.
///
/// The store interprets only `id` and `email` (the unique secondary
/// key). Everything else, including the relationship collections, is
/// opaque payload owned by the layers above; the store never reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, reelstore_macros::Stored)]
pub struct User {
    /// Store-assigned identifier. Leave 0 when registering.
    #[serde(default)]
    pub id: EntityId,
    pub email: String,
    pub login: String,
    pub name: String,
    /// Opaque credential hash; the hashing scheme is chosen upstream.
    pub password_hash: String,
    pub birthday: Option<NaiveDate>,
    /// Ids of befriended users.
    #[serde(default)]
    pub friends: Vec<EntityId>,
    /// Ids of favourited films.
    #[serde(default)]
    pub favourites: Vec<EntityId>,
}
