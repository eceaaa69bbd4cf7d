//! # Favorite Registry
//!
//! Owns the persisted favorites list. Every mutation is a read-modify-write
//! of one storage key:
//! 1. Read the current blob (missing key means an empty list)
//! 2. Validate it into a `FavoriteSet`
//! 3. Apply the change in memory
//! 4. Write the whole set back in one `set` call
//!
//! Mutations hold the store's write lock for the key across all four steps.
//! The lock belongs to the store, not the registry, so any number of
//! registries over one store (through an `Arc`, or two `FileStore`s on the
//! same directory) never read the same snapshot and overwrite each other.
//! Reads (`contains`, `list`) do not take the lock; a store `set` replaces
//! the value in one step, so they always observe a complete list.

use catalog::{Movie, MovieId};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::favorite_set::FavoriteSet;
use crate::store::KeyValueStore;

/// Storage key the favorites list lives under
pub const FAVORITES_KEY: &str = "@FavoriteList";

/// What a successful mutation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Added,
    AlreadyPresent,
    Removed,
    NotPresent,
}

impl Mutation {
    /// Whether the movie is a favorite after this mutation
    pub fn is_favorite(self) -> bool {
        matches!(self, Mutation::Added | Mutation::AlreadyPresent)
    }
}

pub struct FavoriteRegistry<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> FavoriteRegistry<S> {
    /// Create a registry over `store` using the default key
    pub fn new(store: S) -> Self {
        Self::with_key(store, FAVORITES_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether `id` is a favorite.
    ///
    /// An empty, unreadable or malformed store counts as "not a favorite";
    /// the failure is logged and not returned.
    pub async fn contains(&self, id: MovieId) -> bool {
        match self.load().await {
            Ok(set) => set.contains(id),
            Err(e) => {
                warn!("Could not read favorites while checking movie {}: {}", id, e);
                false
            }
        }
    }

    /// All favorites in insertion order, empty if the store cannot be read
    pub async fn list(&self) -> Vec<Movie> {
        match self.load().await {
            Ok(set) => set.into_movies(),
            Err(e) => {
                warn!("Could not read favorites: {}", e);
                Vec::new()
            }
        }
    }

    /// Add `movie` unless a favorite with the same id already exists
    pub async fn add(&self, movie: &Movie) -> Result<Mutation> {
        let lock = self.store.write_lock(&self.key);
        let _guard = lock.lock().await;
        let outcome = self.add_locked(movie).await;
        log_outcome("add", movie.id, &outcome);
        outcome
    }

    /// Remove the favorite with `id`, keeping all others
    pub async fn remove(&self, id: MovieId) -> Result<Mutation> {
        let lock = self.store.write_lock(&self.key);
        let _guard = lock.lock().await;
        let outcome = self.remove_locked(id).await;
        log_outcome("remove", id, &outcome);
        outcome
    }

    /// Flip the favorite flag for `movie` in one critical section.
    ///
    /// Returns the flag after the change.
    pub async fn toggle(&self, movie: &Movie) -> Result<bool> {
        let lock = self.store.write_lock(&self.key);
        let _guard = lock.lock().await;
        let mut set = self.load().await?;
        let outcome = if set.contains(movie.id) {
            set.remove(movie.id);
            self.save(&set).await.map(|()| Mutation::Removed)
        } else {
            set.insert(movie.clone());
            self.save(&set).await.map(|()| Mutation::Added)
        };
        log_outcome("toggle", movie.id, &outcome);
        outcome.map(Mutation::is_favorite)
    }

    async fn add_locked(&self, movie: &Movie) -> Result<Mutation> {
        let mut set = self.load().await?;
        if !set.insert(movie.clone()) {
            return Ok(Mutation::AlreadyPresent);
        }
        self.save(&set).await?;
        Ok(Mutation::Added)
    }

    async fn remove_locked(&self, id: MovieId) -> Result<Mutation> {
        let mut set = self.load().await?;
        if set.remove(id).is_none() {
            return Ok(Mutation::NotPresent);
        }
        self.save(&set).await?;
        Ok(Mutation::Removed)
    }

    async fn load(&self) -> Result<FavoriteSet> {
        match self.store.get(&self.key).await? {
            Some(json) => FavoriteSet::from_json(&json),
            None => Ok(FavoriteSet::new()),
        }
    }

    async fn save(&self, set: &FavoriteSet) -> Result<()> {
        let json = set.to_json()?;
        self.store.set(&self.key, json).await
    }
}

fn log_outcome(op: &str, id: MovieId, outcome: &Result<Mutation>) {
    match outcome {
        Ok(Mutation::Added) | Ok(Mutation::Removed) => {
            info!("Favorite {} for movie {} stored", op, id)
        }
        Ok(other) => debug!("Favorite {} for movie {} was a no-op ({:?})", op, id, other),
        Err(e) => warn!("Favorite {} for movie {} failed: {}", op, id, e),
    }
}
