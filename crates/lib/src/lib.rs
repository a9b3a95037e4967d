//!
//! Propmap: a hash-like container whose keys behave like named properties.
//! This library provides the core container family and the conventions layered on it.
//!
//! ## Core Concepts
//!
//! * **Maps (`map::PropMap`)**: The central container, an insertion-ordered mapping from
//!   normalized string keys to values, optionally carrying a default specification for
//!   absent-key reads.
//! * **Values (`map::Value`)**: Everything a map can hold: primitives, nested maps, and
//!   ordered lists. Any map or list reachable from a map is guaranteed to belong to this
//!   family; foreign JSON input is normalized recursively on the way in.
//! * **Kinds (`kind::Kind`)**: Runtime identity for concrete container flavors. Derived
//!   operations (duplication, merges, filters, transforms) always construct their result
//!   with the receiver's kind, so specialized flavors survive composition.
//! * **Property dispatch (`map::dispatch`)**: A trailing-marker convention on requested
//!   names (`=` assign, `?` truthiness test, `!` force-create, `_` ephemeral-create)
//!   resolved by an explicit dispatcher. Literal keys always shadow the convention.
//! * **Merging (`map::merge`)**: Deep and shallow merge operations that recurse only into
//!   existing family maps hit by foreign objects, with optional conflict resolvers.
//! * **Collision guard (`kind`)**: A process-wide, per-kind registry of warning
//!   suppression; writes that shadow a built-in method name log an advisory diagnostic.

pub mod key;
pub mod kind;
pub mod map;

pub use kind::Kind;
pub use map::{List, PropMap, Value};

/// Result type used throughout the propmap library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the propmap library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured configuration errors from the kind registry
    #[error(transparent)]
    Config(#[from] kind::ConfigError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Config(_) => "kind",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error is a fatal configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Check if this error is serialization-related.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }
}
