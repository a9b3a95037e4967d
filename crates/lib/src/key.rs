//! Key normalization for container access.
//!
//! Every operation that accepts a key (read, write, delete, membership test,
//! batch lookup, path lookup) funnels the key through [`AsKey`] before touching
//! storage, so a map only ever holds canonical string keys and lookups agree
//! with writes regardless of the key representation the caller used.

use std::borrow::Cow;

use crate::map::Value;

/// Types that can act as a container key.
///
/// The canonical form is the string rendering of the key. Normalization is
/// deterministic and idempotent: normalizing an already-normalized key yields
/// the same string.
///
/// # Examples
///
/// ```
/// use propmap::key::normalize;
///
/// assert_eq!(normalize("name"), "name");
/// assert_eq!(normalize(42_i64), "42");
/// assert_eq!(normalize(true), "true");
/// assert_eq!(normalize(normalize("name")), "name");
/// ```
pub trait AsKey {
    /// Returns the canonical string form of this key.
    fn as_key(&self) -> Cow<'_, str>;
}

/// Normalizes any key representation into its owned canonical string form.
pub fn normalize(key: impl AsKey) -> String {
    key.as_key().into_owned()
}

impl AsKey for str {
    fn as_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl AsKey for String {
    fn as_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl<T: AsKey + ?Sized> AsKey for &T {
    fn as_key(&self) -> Cow<'_, str> {
        (**self).as_key()
    }
}

impl AsKey for bool {
    fn as_key(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

macro_rules! impl_as_key_for_int {
    ($($t:ty),*) => {
        $(impl AsKey for $t {
            fn as_key(&self) -> Cow<'_, str> {
                Cow::Owned(self.to_string())
            }
        })*
    };
}

impl_as_key_for_int!(i32, i64, u32, u64, usize);

impl AsKey for Value {
    fn as_key(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }
}
