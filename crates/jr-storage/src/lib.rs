//! Persistence for analyzed job roles.
//!
//! The store is the durable source of truth; the similarity index is rebuilt
//! from `RoleStore::iter_all_embeddings` on startup.

pub mod file_store;
pub mod memory;
pub mod record;
pub mod traits;

pub use file_store::FileRoleStore;
pub use memory::MemoryRoleStore;
pub use record::StoredRole;
pub use traits::RoleStore;
