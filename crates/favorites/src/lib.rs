//! # Favorites Crate
//!
//! Durable favorite-movie list kept in a local key-value store.
//!
//! ## Components
//!
//! - **store**: the `KeyValueStore` trait and an in-memory `MemoryStore`
//! - **file_store**: `FileStore`, one atomically replaced file per key
//! - **favorite_set**: `FavoriteSet`, the ordered, id-unique list
//! - **registry**: `FavoriteRegistry`, serialized add/remove/contains
//!
//! ## Example Usage
//!
//! ```ignore
//! use favorites::{FavoriteRegistry, FileStore};
//!
//! let registry = FavoriteRegistry::new(FileStore::new("/var/lib/reel-detail"));
//! registry.add(&movie).await?;
//! assert!(registry.contains(movie.id).await);
//! ```

pub mod error;
pub mod favorite_set;
pub mod file_store;
pub mod registry;
pub mod store;

pub use error::{Result, StorageError};
pub use favorite_set::FavoriteSet;
pub use file_store::FileStore;
pub use registry::{FAVORITES_KEY, FavoriteRegistry, Mutation};
pub use store::{KeyLocks, KeyValueStore, MemoryStore};
