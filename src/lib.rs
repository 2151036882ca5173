//! # frozenmap
//!
//! A persistent (immutable) map for Rust backed by a left-leaning
//! red-black tree.
//!
//! ## Overview
//!
//! [`FrozenMap`](persistent::FrozenMap) is an ordered associative map in
//! which every insert returns a *new* map value. The new map shares all
//! unmodified subtrees with the original, so prior references stay valid
//! and unchanged:
//!
//! ```rust
//! use frozenmap::persistent::FrozenMap;
//!
//! let map1 = FrozenMap::new().insert(1, "one");
//! let map2 = map1.insert(2, "two");
//!
//! assert_eq!(map1.len(), 1); // Original unchanged
//! assert_eq!(map2.len(), 2); // New version
//! ```
//!
//! Because no map is ever mutated after construction, any number of
//! threads may read the same map version concurrently without locks.
//! Enable the `arc` feature to share maps across threads.
//!
//! ## Feature Flags
//!
//! - `arc`: use `Arc` instead of `Rc` for shared tree nodes, making
//!   the map `Send + Sync` when its keys and values are
//! - `serde`: `Serialize`/`Deserialize` implementations for the map

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use frozenmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
}

pub mod persistent;
