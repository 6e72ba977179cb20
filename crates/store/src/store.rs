use async_trait::async_trait;

use crate::{Entity, Result};

/// Core trait for repository implementations.
///
/// A repository persists and retrieves entities of a single type. The
/// workflow treats it as reliable and synchronous in effect: once `save`
/// returns, subsequent reads observe the write.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Inserts or replaces an entity.
    ///
    /// If the entity has no id yet, the next id in the store's sequence is
    /// assigned. Returns the entity as stored (with its id set).
    async fn save(&self, entity: E) -> Result<E>;

    /// Retrieves an entity by id.
    ///
    /// Returns None if no entity with that id exists.
    async fn find_by_id(&self, id: E::Id) -> Result<Option<E>>;

    /// Retrieves all entities in ascending id order.
    async fn find_all(&self) -> Result<Vec<E>>;

    /// Removes one entity. Returns false if no entity had that id.
    async fn delete(&self, id: E::Id) -> Result<bool>;

    /// Removes every entity and resets the id sequence.
    async fn delete_all(&self) -> Result<()>;
}

/// Extension trait providing secondary-key lookups for repositories.
#[async_trait]
pub trait RepositoryExt<E: Entity>: Repository<E> {
    /// Returns the first entity (in id order) matching the predicate.
    async fn find_first<F>(&self, predicate: F) -> Result<Option<E>>
    where
        F: Fn(&E) -> bool + Send + Sync,
    {
        Ok(self.find_all().await?.into_iter().find(|e| predicate(e)))
    }

    /// Returns every entity (in id order) matching the predicate.
    async fn find_where<F>(&self, predicate: F) -> Result<Vec<E>>
    where
        F: Fn(&E) -> bool + Send + Sync,
    {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|e| predicate(e))
            .collect())
    }

    /// Checks if any entity matches the predicate.
    async fn exists<F>(&self, predicate: F) -> Result<bool>
    where
        F: Fn(&E) -> bool + Send + Sync,
    {
        Ok(self.find_first(predicate).await?.is_some())
    }
}

// Blanket implementation for all Repository implementations
impl<E: Entity, T: Repository<E> + ?Sized> RepositoryExt<E> for T {}
