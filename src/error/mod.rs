//! Classified errors: a layer tag for diagnostics, a kind tag for behavior.
//!
//! Every fallible operation in this crate returns a [`ClassifiedError`].
//! The [`Kind`] is the only stable branching target; the transport layer
//! above this crate maps kinds to status codes and decides which message,
//! if any, reaches the API caller. The [`Layer`] records where the failure
//! originated and exists for logging only.

mod classified;
mod kind;
mod layer;

pub use classified::{is, ClassifiedError};
pub use kind::Kind;
pub use layer::Layer;
