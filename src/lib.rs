// Lets the `reelstore::` paths emitted by the Stored derive resolve when
// the derive is used inside this crate.
extern crate self as reelstore;

mod error;
mod films;
mod sessions;
mod store;
mod users;

pub use error::{is, ClassifiedError, Kind, Layer};
pub use films::{Film, FilmStore, Genre};
pub use sessions::SessionStore;
pub use store::{EntityId, EntityStore, IdAllocator, Stored};
pub use users::{User, UserStore};

// Re-export the derive macro so consumers only need this crate
pub use reelstore_macros::Stored;
