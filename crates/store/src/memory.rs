use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Entity, Repository, Result, StoreError};

struct MemoryState<E: Entity> {
    entities: BTreeMap<E::Id, E>,
    next_id: u64,
}

impl<E: Entity> Default for MemoryState<E> {
    fn default() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory repository implementation.
///
/// Entities are kept in id order, so `find_all` is stable across calls.
/// Clones share the same underlying state.
pub struct InMemoryRepository<E: Entity> {
    state: Arc<RwLock<MemoryState<E>>>,
    fail_on_save: Arc<AtomicBool>,
}

impl<E: Entity> InMemoryRepository<E> {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::default())),
            fail_on_save: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the number of entities stored.
    pub async fn count(&self) -> usize {
        self.state.read().await.entities.len()
    }

    /// Configures the repository to reject saves, simulating an outage.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.fail_on_save.store(fail, Ordering::SeqCst);
    }
}

impl<E: Entity> Clone for InMemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            fail_on_save: Arc::clone(&self.fail_on_save),
        }
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn save(&self, mut entity: E) -> Result<E> {
        if self.fail_on_save.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                entity_type: E::entity_type(),
                reason: "writes are disabled".to_string(),
            });
        }

        let mut state = self.state.write().await;

        let id = match entity.id() {
            Some(id) => {
                // Keep the sequence ahead of explicitly keyed entities
                let raw: u64 = id.into();
                if raw >= state.next_id {
                    state.next_id = raw.checked_add(1).ok_or(StoreError::IdsExhausted {
                        entity_type: E::entity_type(),
                    })?;
                }
                id
            }
            None => {
                let raw = state.next_id;
                state.next_id = raw.checked_add(1).ok_or(StoreError::IdsExhausted {
                    entity_type: E::entity_type(),
                })?;
                let id = E::Id::from(raw);
                entity.set_id(id);
                tracing::debug!(entity_type = E::entity_type(), %id, "assigned new id");
                id
            }
        };

        state.entities.insert(id, entity.clone());
        Ok(entity)
    }

    async fn find_by_id(&self, id: E::Id) -> Result<Option<E>> {
        Ok(self.state.read().await.entities.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<E>> {
        Ok(self.state.read().await.entities.values().cloned().collect())
    }

    async fn delete(&self, id: E::Id) -> Result<bool> {
        let removed = self.state.write().await.entities.remove(&id).is_some();
        if removed {
            tracing::debug!(entity_type = E::entity_type(), %id, "deleted entity");
        }
        Ok(removed)
    }

    async fn delete_all(&self) -> Result<()> {
        let mut state = self.state.write().await;
        let removed = state.entities.len();
        *state = MemoryState::default();
        tracing::info!(entity_type = E::entity_type(), removed, "deleted all entities");
        Ok(())
    }
}
