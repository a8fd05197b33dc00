//! Film catalog records and their store.

mod store;

pub use store::FilmStore;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::EntityId;

/// Film genres as a closed set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Action,
    Animation,
    Comedy,
    Documentary,
    Drama,
    Thriller,
}

/// A catalog film record.
///
/// The store indexes `genres` (filtering) and `release_date` (ordering).
/// The rest of the record is an opaque value to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, reelstore_macros::Stored)]
pub struct Film {
    /// Store-assigned identifier. Leave 0 when adding.
    #[serde(default)]
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub genres: BTreeSet<Genre>,
    /// Ids of the credited directors. Opaque to the store.
    #[serde(default)]
    pub directors: Vec<EntityId>,
    pub release_date: NaiveDate,
    pub duration_minutes: u32,
}
