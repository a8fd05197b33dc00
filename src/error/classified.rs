use std::error::Error;
use std::fmt;
use std::time::SystemTime;

use super::{Kind, Layer};

/// An error value tagged with exactly one [`Layer`] and one [`Kind`].
///
/// Carries up to two messages with different audiences: a client-facing
/// message that is safe to return from an API, and an internal diagnostic
/// that must only ever be logged. Most call sites set only the client
/// message; the convenience constructors reflect that.
#[derive(Debug, Clone)]
pub struct ClassifiedError {
    layer: Layer,
    kind: Kind,
    client: Option<String>,
    internal: Option<String>,
    occurred_at: SystemTime,
}

impl ClassifiedError {
    /// Construct a bare classified error with no messages.
    pub fn new(layer: Layer, kind: Kind) -> Self {
        ClassifiedError {
            layer,
            kind,
            client: None,
            internal: None,
            occurred_at: SystemTime::now(),
        }
    }

    /// A `NotFound` error with a client-safe message.
    pub fn not_found(layer: Layer, client: impl Into<String>) -> Self {
        Self::new(layer, Kind::NotFound).with_client(client)
    }

    /// An `AlreadyExists` error with a client-safe message.
    pub fn already_exists(layer: Layer, client: impl Into<String>) -> Self {
        Self::new(layer, Kind::AlreadyExists).with_client(client)
    }

    /// A `Forbidden` error with a client-safe message.
    pub fn forbidden(layer: Layer, client: impl Into<String>) -> Self {
        Self::new(layer, Kind::Forbidden).with_client(client)
    }

    /// An `Unprocessable` error with a client-safe message.
    pub fn unprocessable(layer: Layer, client: impl Into<String>) -> Self {
        Self::new(layer, Kind::Unprocessable).with_client(client)
    }

    /// An `Internal` error carrying a diagnostic, not a client message.
    /// The boundary above is expected to log the diagnostic and answer
    /// with a generic message of its own.
    pub fn internal(layer: Layer, diagnostic: impl Into<String>) -> Self {
        Self::new(layer, Kind::Internal).with_internal(diagnostic)
    }

    /// Attach a client-safe message. Returns `self` for chaining.
    pub fn with_client(mut self, message: impl Into<String>) -> Self {
        self.client = Some(message.into());
        self
    }

    /// Attach an internal diagnostic. Returns `self` for chaining.
    pub fn with_internal(mut self, message: impl Into<String>) -> Self {
        self.internal = Some(message.into());
        self
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// The message that may be surfaced to an API caller, if any.
    pub fn client_message(&self) -> Option<&str> {
        self.client.as_deref()
    }

    /// The diagnostic message. Log it; never return it to a caller.
    pub fn internal_message(&self) -> Option<&str> {
        self.internal.as_deref()
    }

    /// When the error value was constructed.
    pub fn occurred_at(&self) -> SystemTime {
        self.occurred_at
    }

    /// Whether this error carries the given kind.
    pub fn is_kind(&self, kind: Kind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error in {} layer", self.kind, self.layer)?;
        if let Some(client) = &self.client {
            write!(f, ": {}", client)?;
        }
        if let Some(internal) = &self.internal {
            write!(f, " [{}]", internal)?;
        }
        Ok(())
    }
}

impl Error for ClassifiedError {}

/// Compare a candidate error's kind against a reference kind.
///
/// Works through `dyn Error`, so callers holding boxed or borrowed errors
/// from any layer can branch without knowing the concrete type. Any error
/// that is not a [`ClassifiedError`] compares `false` to every kind.
pub fn is(err: &(dyn Error + 'static), kind: Kind) -> bool {
    err.downcast_ref::<ClassifiedError>()
        .map(|classified| classified.kind == kind)
        .unwrap_or(false)
}
