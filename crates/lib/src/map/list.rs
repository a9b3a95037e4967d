//! The ordered-sequence family member for container values.
//!
//! `List` is the only sequence type a map ever holds. Foreign sequences are
//! rebuilt into a `List` with every element converted, so nested structure
//! inside a list satisfies the same normalization guarantee as the maps
//! around it.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::value::Value;

/// Ordered collection of container values.
///
/// # Examples
///
/// ```
/// use propmap::{List, Value};
///
/// let mut list = List::new();
/// list.push(Value::Int(1));
/// list.push(Value::Text("two".to_string()));
///
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.get(0), Some(&Value::Int(1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List {
    items: Vec<Value>,
}

impl List {
    /// Creates a new empty list
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns the number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list holds no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a value, returning its index
    pub fn push(&mut self, value: impl Into<Value>) -> usize {
        self.items.push(value.into());
        self.items.len() - 1
    }

    /// Gets a value by index (immutable reference)
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Gets a mutable reference to a value by index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    /// Removes and returns the value at `index`, shifting later elements
    pub fn remove(&mut self, index: usize) -> Option<Value> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Removes all elements
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns an iterator over the elements
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    /// Returns a mutable iterator over the elements
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.items.iter_mut()
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "]")
    }
}

impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        Self { items }
    }
}

impl FromIterator<Value> for List {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for List {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Index<usize> for List {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.items[index]
    }
}

impl Serialize for List {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter())
    }
}

impl<'de> Deserialize<'de> for List {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<Value>::deserialize(deserializer)?;
        Ok(Self { items })
    }
}
