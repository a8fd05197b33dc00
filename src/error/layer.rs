use std::fmt;

/// Where a failure originated. Diagnostic context only; status-code and
/// behavior decisions come from [`crate::Kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Repository layer: entity and session stores.
    Storage,
    /// Use-case / business-logic layer.
    Logic,
    /// Delivery layer: HTTP handlers, marshaling, validation.
    Transport,
    /// Process-level failures outside any request.
    Server,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Storage => write!(f, "storage"),
            Layer::Logic => write!(f, "logic"),
            Layer::Transport => write!(f, "transport"),
            Layer::Server => write!(f, "server"),
        }
    }
}
