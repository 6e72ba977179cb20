pub mod entity;
pub mod error;
pub mod memory;
pub mod store;

pub use entity::Entity;
pub use error::{Result, StoreError};
pub use memory::InMemoryRepository;
pub use store::{Repository, RepositoryExt};
