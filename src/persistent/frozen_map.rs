//! Persistent (immutable) map facade over the left-leaning red-black
//! tree engine.
//!
//! This module provides [`FrozenMap`], an immutable ordered map. All
//! balancing logic lives in the tree engine; the facade normalizes
//! heterogeneous construction inputs into insert calls and exposes the
//! resulting root through mapping-style operations.
//!
//! # Examples
//!
//! ```rust
//! use frozenmap::persistent::FrozenMap;
//!
//! let map = FrozenMap::new()
//!     .insert(3, "three")
//!     .insert(1, "one")
//!     .insert(2, "two");
//!
//! // Entries are always in sorted key order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//! ```

use super::llrb::{self, Link, Node};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

// =============================================================================
// Error Definition
// =============================================================================

/// Errors produced by [`FrozenMap`] operations.
///
/// Both conditions are ordinary control-flow signals raised synchronously
/// at the point of detection; no operation leaves a partially-built map
/// behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrozenMapError {
    /// A lookup was performed for a key that is not in the map.
    KeyNotFound {
        /// Debug rendering of the missing key.
        key: String,
    },
    /// More than one positional source was supplied at construction.
    InvalidArguments {
        /// How many positional sources were supplied.
        supplied: usize,
    },
}

impl fmt::Display for FrozenMapError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound { key } => write!(formatter, "key not found: {key}"),
            Self::InvalidArguments { supplied } => write!(
                formatter,
                "construction expected at most 1 positional source, got {supplied}"
            ),
        }
    }
}

impl std::error::Error for FrozenMapError {}

// =============================================================================
// Construction Source Definition
// =============================================================================

/// A positional construction source for [`FrozenMap::from_sources`].
///
/// One variant per accepted source shape, resolved once at call time.
pub enum MapSource<K, V> {
    /// Another frozen map. Its root is shared directly in O(1); no
    /// inserts are performed.
    Map(FrozenMap<K, V>),
    /// A key set plus a lookup function. One entry is inserted per key,
    /// in the order of the key set, with the value obtained from the
    /// lookup function.
    Keyed {
        /// The keys to insert, in insertion order.
        keys: Vec<K>,
        /// Produces the value for each key.
        lookup: Box<dyn Fn(&K) -> V>,
    },
    /// A plain sequence of key-value pairs, inserted in sequence order.
    Pairs(Vec<(K, V)>),
}

// =============================================================================
// FrozenMap Definition
// =============================================================================

/// A persistent (immutable) ordered map backed by a left-leaning
/// red-black tree.
///
/// Every insert returns a new map that shares all unmodified subtrees
/// with the original, so prior map values remain valid and unchanged.
/// Cloning a map is O(1): only the root reference is duplicated.
///
/// Keys must implement `Ord`. Iteration always yields entries in
/// ascending key order, regardless of insertion order.
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `new`          | O(1)       |
/// | `get`          | O(log N)   |
/// | `insert`       | O(log N)   |
/// | `contains_key` | O(log N)   |
/// | `min`/`max`    | O(log N)   |
/// | `len`          | O(n)       |
/// | `is_empty`     | O(1)       |
///
/// `len` recounts the tree on every call; the map handle holds nothing
/// but the root reference.
///
/// # Examples
///
/// ```rust
/// use frozenmap::persistent::FrozenMap;
///
/// let map1 = FrozenMap::new().insert(1, "one");
/// let map2 = map1.insert(1, "ONE");
///
/// assert_eq!(map1.get(&1), Some(&"one")); // Original unchanged
/// assert_eq!(map2.get(&1), Some(&"ONE")); // New version
/// ```
#[derive(Clone)]
pub struct FrozenMap<K, V> {
    /// Root node of the tree; `None` for the empty map.
    root: Link<K, V>,
}

impl<K, V> FrozenMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::persistent::FrozenMap;
    ///
    /// let map: FrozenMap<i32, String> = FrozenMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None }
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(n) — the count is recomputed by walking the tree; no size is
    /// cached on the handle.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::persistent::FrozenMap;
    ///
    /// let map = FrozenMap::new()
    ///     .insert(1, "one")
    ///     .insert(2, "two")
    ///     .insert(1, "ONE");
    /// assert_eq!(map.len(), 2);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        llrb::node_len(self.root.as_ref())
    }

    /// Returns a lazy iterator over entries in ascending key order.
    ///
    /// The traversal is non-destructive and restartable: because the tree
    /// is immutable, a fresh iterator can be started from the same map at
    /// any time.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::persistent::FrozenMap;
    ///
    /// let map = FrozenMap::new()
    ///     .insert(2, "two")
    ///     .insert(1, "one");
    ///
    /// let entries: Vec<(&i32, &&str)> = map.iter().collect();
    /// assert_eq!(entries, vec![(&1, &"one"), (&2, &"two")]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> FrozenMapIterator<'_, K, V> {
        FrozenMapIterator::new(self.root.as_ref())
    }

    /// Returns a lazy iterator over keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns a lazy iterator over values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Renders the internal tree structure for diagnostics.
    ///
    /// One node field per line, children indented two spaces, `-` marking
    /// an absent child.
    #[must_use]
    pub fn render_tree(&self) -> String
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        let mut out = String::new();
        llrb::render(self.root.as_ref(), "", &mut out);
        out
    }
}

impl<K: Clone + Ord, V: Clone> FrozenMap<K, V> {
    /// Creates a map containing a single key-value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::persistent::FrozenMap;
    ///
    /// let map = FrozenMap::singleton(42, "answer");
    /// assert_eq!(map.get(&42), Some(&"answer"));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().insert(key, value)
    }

    /// Builds a map from at most one positional source plus overrides.
    ///
    /// The source shapes are described by [`MapSource`]. Overrides are
    /// applied last, in argument order, overwriting any same-named key
    /// from the positional source.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenMapError::InvalidArguments`] if more than one
    /// positional source is supplied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::persistent::{FrozenMap, MapSource};
    ///
    /// let map = FrozenMap::from_sources(
    ///     [MapSource::Pairs(vec![(1, "one"), (2, "two")])],
    ///     [(2, "TWO")],
    /// ).unwrap();
    ///
    /// assert_eq!(map.get(&1), Some(&"one"));
    /// assert_eq!(map.get(&2), Some(&"TWO")); // Override wins
    /// ```
    pub fn from_sources<S, O>(sources: S, overrides: O) -> Result<Self, FrozenMapError>
    where
        S: IntoIterator<Item = MapSource<K, V>>,
        O: IntoIterator<Item = (K, V)>,
    {
        let mut sources = sources.into_iter();
        let first = sources.next();
        let extra = sources.count();
        if extra > 0 {
            return Err(FrozenMapError::InvalidArguments {
                supplied: extra + 1,
            });
        }

        let base = match first {
            None => Self::new(),
            Some(MapSource::Map(map)) => map,
            Some(MapSource::Keyed { keys, lookup }) => {
                keys.into_iter().fold(Self::new(), |map, key| {
                    let value = lookup(&key);
                    map.insert(key, value)
                })
            }
            Some(MapSource::Pairs(pairs)) => pairs.into_iter().collect(),
        };

        Ok(overrides
            .into_iter()
            .fold(base, |map, (key, value)| map.insert(key, value)))
    }

    /// Inserts a key-value pair, returning the new map.
    ///
    /// If the map already contains the key, only its value is replaced;
    /// the length does not change. The original map is untouched.
    ///
    /// # Complexity
    ///
    /// O(log N), allocating one new node per level on the search path.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::persistent::FrozenMap;
    ///
    /// let map1 = FrozenMap::new().insert(1, "one");
    /// let map2 = map1.insert(2, "two");
    ///
    /// assert_eq!(map1.len(), 1); // Original unchanged
    /// assert_eq!(map2.len(), 2); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let new_root = llrb::insert(self.root.as_ref(), key, value);
        Self {
            root: Some(llrb::blacken(new_root)),
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form must match the ordering on the key
    /// type.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::persistent::FrozenMap;
    ///
    /// let map = FrozenMap::new().insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        llrb::search(self.root.as_ref(), key)
    }

    /// Returns a reference to the value corresponding to the key, or a
    /// [`FrozenMapError::KeyNotFound`] naming the missing key.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenMapError::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use frozenmap::persistent::{FrozenMap, FrozenMapError};
    ///
    /// let map = FrozenMap::new().insert(1, "one");
    ///
    /// assert_eq!(map.try_get(&1), Ok(&"one"));
    /// assert_eq!(
    ///     map.try_get(&2),
    ///     Err(FrozenMapError::KeyNotFound { key: "2".to_string() })
    /// );
    /// ```
    pub fn try_get<Q>(&self, key: &Q) -> Result<&V, FrozenMapError>
    where
        K: Borrow<Q>,
        Q: Ord + fmt::Debug + ?Sized,
    {
        self.get(key).ok_or_else(|| FrozenMapError::KeyNotFound {
            key: format!("{key:?}"),
        })
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// Never fails.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns the entry with the minimum key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        llrb::min_entry(self.root.as_ref())
    }

    /// Returns the entry with the maximum key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        llrb::max_entry(self.root.as_ref())
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// A lazy in-order iterator over the entries of a [`FrozenMap`].
///
/// Holds the unvisited left spine of the tree on an explicit stack, so
/// entries are produced on demand without materializing the whole map.
pub struct FrozenMapIterator<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> FrozenMapIterator<'a, K, V> {
    fn new(root: Option<&'a super::ReferenceCounter<Node<K, V>>>) -> Self {
        let mut iterator = Self { stack: Vec::new() };
        iterator.push_left_spine(root.map(|node| &**node));
        iterator
    }

    /// Pushes `node` and every node on its left spine onto the stack.
    fn push_left_spine(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for FrozenMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // At least the stacked nodes remain; their right subtrees are unknown.
        (self.stack.len(), None)
    }
}

impl<K, V> std::iter::FusedIterator for FrozenMapIterator<'_, K, V> {}

/// An owning iterator over the entries of a [`FrozenMap`].
pub struct FrozenMapIntoIterator<K, V> {
    entries: Vec<(K, V)>,
    current_index: usize,
}

impl<K: Clone, V: Clone> Iterator for FrozenMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.entries.len() {
            None
        } else {
            let entry = self.entries[self.current_index].clone();
            self.current_index += 1;
            Some(entry)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len().saturating_sub(self.current_index);
        (remaining, Some(remaining))
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for FrozenMapIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.entries.len().saturating_sub(self.current_index)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for FrozenMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Ord, V: Clone> FromIterator<(K, V)> for FrozenMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (key, value)| map.insert(key, value))
    }
}

impl<K: Clone, V: Clone> IntoIterator for FrozenMap<K, V> {
    type Item = (K, V);
    type IntoIter = FrozenMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let entries: Vec<(K, V)> = self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        FrozenMapIntoIterator {
            entries,
            current_index: 0,
        }
    }
}

impl<'a, K, V> IntoIterator for &'a FrozenMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = FrozenMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for FrozenMap<K, V> {
    /// Entrywise comparison in key order.
    ///
    /// Two maps with the same entries compare equal even when their tree
    /// shapes differ from different insertion orders.
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for FrozenMap<K, V> {}

impl<K: Hash, V: Hash> Hash for FrozenMap<K, V> {
    /// Hashes each entry in key order, then the entry count.
    ///
    /// Iteration order is independent of insertion order, so equal maps
    /// produce equal hashes.
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut entries = 0_usize;
        for (key, value) in self.iter() {
            key.hash(state);
            value.hash(state);
            entries += 1;
        }
        entries.hash(state);
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for FrozenMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "FrozenMap(")?;
        formatter.debug_map().entries(self.iter()).finish()?;
        write!(formatter, ")")
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for FrozenMap<K, V> {
    /// Renders all entries in ascending key order as
    /// `FrozenMap({k1: v1, k2: v2, ...})`.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "FrozenMap({{")?;
        let mut first = true;
        for (key, value) in self.iter() {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}})")
    }
}

// =============================================================================
// Thread Safety Assertions
// =============================================================================

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(FrozenMap<i32, String>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(FrozenMap<i32, String>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for FrozenMap<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct FrozenMapVisitor<K, V> {
    key_marker: std::marker::PhantomData<K>,
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<K, V> FrozenMapVisitor<K, V> {
    const fn new() -> Self {
        Self {
            key_marker: std::marker::PhantomData,
            value_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for FrozenMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Clone + Ord,
    V: serde::Deserialize<'de> + Clone,
{
    type Value = FrozenMap<K, V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = FrozenMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map = map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for FrozenMap<K, V>
where
    K: serde::Deserialize<'de> + Clone + Ord,
    V: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(FrozenMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // =========================================================================
    // Display and Debug Tests
    // =========================================================================

    #[rstest]
    fn test_display_empty_map() {
        let map: FrozenMap<i32, String> = FrozenMap::new();
        assert_eq!(format!("{map}"), "FrozenMap({})");
    }

    #[rstest]
    fn test_display_single_entry_map() {
        let map = FrozenMap::singleton(1, "one");
        assert_eq!(format!("{map}"), "FrozenMap({1: one})");
    }

    #[rstest]
    fn test_display_renders_entries_in_key_order() {
        let map = FrozenMap::new()
            .insert(2, "two")
            .insert(3, "three")
            .insert(1, "one");
        assert_eq!(format!("{map}"), "FrozenMap({1: one, 2: two, 3: three})");
    }

    #[rstest]
    fn test_debug_uses_debug_formatting_for_entries() {
        let map = FrozenMap::new().insert(1, "one".to_string());
        assert_eq!(format!("{map:?}"), "FrozenMap({1: \"one\"})");
    }

    // =========================================================================
    // Error Display Tests
    // =========================================================================

    #[rstest]
    fn test_key_not_found_display() {
        let error = FrozenMapError::KeyNotFound {
            key: "42".to_string(),
        };
        assert_eq!(format!("{error}"), "key not found: 42");
    }

    #[rstest]
    fn test_invalid_arguments_display() {
        let error = FrozenMapError::InvalidArguments { supplied: 3 };
        assert_eq!(
            format!("{error}"),
            "construction expected at most 1 positional source, got 3"
        );
    }

    // =========================================================================
    // Render Tree Tests
    // =========================================================================

    #[rstest]
    fn test_render_tree_empty_map() {
        let map: FrozenMap<i32, String> = FrozenMap::new();
        assert_eq!(map.render_tree(), "-\n");
    }

    #[rstest]
    fn test_render_tree_single_entry() {
        let map = FrozenMap::singleton(1, "one");
        assert_eq!(
            map.render_tree(),
            "key: 1\nvalue: \"one\"\nleft:\n  -\nright:\n  -\n"
        );
    }
}
