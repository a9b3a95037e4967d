//! Concrete container kinds and the collision-guard registry.
//!
//! Rust has no subclassing, so the "concrete container subtype" of the original
//! design is an explicit runtime identity: every [`crate::PropMap`] carries a
//! [`Kind`], and derived operations construct their results with the receiver's
//! kind. Kinds are registered in a process-wide registry that also holds the
//! per-kind warning-suppression state consulted on every colliding write.
//!
//! The registry is written rarely (at kind definition and explicit suppression
//! calls) and read on colliding writes, so it lives behind a single `RwLock`.
//! A freshly defined kind snapshots its parent's suppression entry at
//! definition time; later changes to the parent do not propagate.

use std::collections::HashSet;
use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

use thiserror::Error;

/// Structured error types for kind-registry configuration.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Collision suppression was requested on the base kind, which must always warn.
    #[error("cannot disable collision warnings on the base kind '{kind}'")]
    RootSuppression { kind: String },
}

impl ConfigError {
    /// Check if this error is a root-suppression configuration error.
    pub fn is_root_suppression(&self) -> bool {
        matches!(self, ConfigError::RootSuppression { .. })
    }
}

/// Identity of a concrete container flavor.
///
/// `Kind` is a cheap copyable id into the process-wide registry. The base kind
/// [`Kind::BASE`] always exists; derived kinds are created with
/// [`Kind::define`].
///
/// # Examples
///
/// ```
/// use propmap::Kind;
///
/// let settings = Kind::define("Settings", Kind::BASE);
/// assert_eq!(settings.name(), "Settings");
/// assert_eq!(settings.parent(), Some(Kind::BASE));
///
/// settings.enable_suppression(&["merge"]).unwrap();
/// assert!(settings.is_suppressed("merge"));
/// assert!(!settings.is_suppressed("keys"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Kind(u32);

#[derive(Clone)]
struct KindEntry {
    name: String,
    parent: Option<Kind>,
    suppress_all: bool,
    suppressed: HashSet<String>,
}

static REGISTRY: OnceLock<RwLock<Vec<KindEntry>>> = OnceLock::new();

fn registry() -> &'static RwLock<Vec<KindEntry>> {
    REGISTRY.get_or_init(|| {
        RwLock::new(vec![KindEntry {
            name: "PropMap".to_string(),
            parent: None,
            suppress_all: false,
            suppressed: HashSet::new(),
        }])
    })
}

impl Kind {
    /// The root kind of the container family.
    pub const BASE: Kind = Kind(0);

    /// Registers a new kind derived from `parent`.
    ///
    /// The new kind snapshots the parent's suppression entry at definition
    /// time: a copy, not a live reference. Changing the parent's suppression
    /// afterwards has no effect on the child.
    pub fn define(name: impl Into<String>, parent: Kind) -> Kind {
        let mut reg = registry().write().unwrap_or_else(PoisonError::into_inner);
        let (suppress_all, suppressed) = {
            let parent_entry = &reg[parent.0 as usize];
            (parent_entry.suppress_all, parent_entry.suppressed.clone())
        };
        reg.push(KindEntry {
            name: name.into(),
            parent: Some(parent),
            suppress_all,
            suppressed,
        });
        Kind((reg.len() - 1) as u32)
    }

    /// Returns the registered name of this kind.
    pub fn name(&self) -> String {
        let reg = registry().read().unwrap_or_else(PoisonError::into_inner);
        reg[self.0 as usize].name.clone()
    }

    /// Returns the kind this one was derived from, or `None` for the base kind.
    pub fn parent(&self) -> Option<Kind> {
        let reg = registry().read().unwrap_or_else(PoisonError::into_inner);
        reg[self.0 as usize].parent
    }

    /// Returns true for the root kind of the family.
    pub fn is_base(&self) -> bool {
        *self == Kind::BASE
    }

    /// Enables collision-warning suppression for this kind.
    ///
    /// With no names given, clears the suppressed-name set and suppresses all
    /// warnings. With names given, merges them into the suppressed set and
    /// sets the suppress-all flag; [`Kind::is_suppressed`] then decides by set
    /// membership.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RootSuppression`] when called on [`Kind::BASE`].
    /// This is the only fatal configuration error in the library.
    pub fn enable_suppression(&self, names: &[&str]) -> crate::Result<()> {
        if self.is_base() {
            return Err(ConfigError::RootSuppression { kind: self.name() }.into());
        }
        let mut reg = registry().write().unwrap_or_else(PoisonError::into_inner);
        let entry = &mut reg[self.0 as usize];
        if names.is_empty() {
            entry.suppressed.clear();
        } else {
            entry.suppressed.extend(names.iter().map(|s| s.to_string()));
        }
        entry.suppress_all = true;
        Ok(())
    }

    /// Returns true if collision warnings for `name` are suppressed on this kind.
    ///
    /// A non-empty suppressed-name set decides by membership; otherwise the
    /// suppress-all flag applies.
    pub fn is_suppressed(&self, name: &str) -> bool {
        let reg = registry().read().unwrap_or_else(PoisonError::into_inner);
        let entry = &reg[self.0 as usize];
        if !entry.suppressed.is_empty() {
            entry.suppressed.contains(name)
        } else {
            entry.suppress_all
        }
    }
}

impl Default for Kind {
    fn default() -> Self {
        Kind::BASE
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Built-in container surface names with the origin of each.
///
/// A write whose normalized key appears here shadows a method every map
/// answers to, so readers can no longer reach the stored value through
/// property-style access alone.
pub(crate) const RESERVED_SURFACE: &[(&str, &str)] = &[
    ("get", "core read surface"),
    ("get_mut", "core read surface"),
    ("read", "core read surface"),
    ("fetch", "core read surface"),
    ("fetch_or", "core read surface"),
    ("dig", "core read surface"),
    ("insert", "core write surface"),
    ("remove", "core write surface"),
    ("clear", "core write surface"),
    ("contains_key", "membership surface"),
    ("len", "size surface"),
    ("is_empty", "size surface"),
    ("keys", "iteration surface"),
    ("values", "iteration surface"),
    ("values_at", "iteration surface"),
    ("iter", "iteration surface"),
    ("iter_mut", "iteration surface"),
    ("merge", "merge engine"),
    ("update", "merge engine"),
    ("deep_merge", "merge engine"),
    ("deep_merge_with", "merge engine"),
    ("deep_update", "merge engine"),
    ("deep_update_with", "merge engine"),
    ("replace", "merge engine"),
    ("duplicate", "derived construction"),
    ("compact", "derived construction"),
    ("invert", "derived construction"),
    ("slice", "derived construction"),
    ("filter_select", "derived construction"),
    ("filter_reject", "derived construction"),
    ("transform_values", "derived construction"),
    ("transform_keys", "derived construction"),
    ("invoke", "property dispatch"),
    ("invoke_with", "property dispatch"),
    ("responds_to", "property dispatch"),
    ("truthy", "property dispatch"),
    ("force", "property dispatch"),
    ("ephemeral", "property dispatch"),
    ("kind", "identity surface"),
    ("to_json", "serialization surface"),
];

/// Emits an advisory diagnostic if a write to `key` shadows built-in surface
/// behavior and suppression does not apply for the writing kind.
///
/// Advisory only: the caller proceeds with the write either way. Callers
/// invoke this for writes that introduce the key; a name already present as
/// ordinary data maps to user data, not built-in capability, so overwrites
/// are not reported again.
pub(crate) fn warn_on_collision(kind: Kind, key: &str) {
    if let Some((_, origin)) = RESERVED_SURFACE.iter().find(|(name, _)| *name == key)
        && !kind.is_suppressed(key)
    {
        tracing::warn!(
            kind = %kind.name(),
            key,
            origin,
            "key shadows a built-in container method; reads must go through explicit accessors"
        );
    }
}
