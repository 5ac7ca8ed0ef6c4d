//! Storage implementations
//!
//! Both stores implement all three repository traits; `Repositories` hands
//! them out as trait objects so the rest of the crate never names a backend.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

use std::sync::Arc;

use crate::{ElementRepository, InviteRepository, NamespaceRepository};

/// Repository handles shared by use cases, the gateway and the API.
#[derive(Clone)]
pub struct Repositories {
    pub namespaces: Arc<dyn NamespaceRepository>,
    pub elements: Arc<dyn ElementRepository>,
    pub invites: Arc<dyn InviteRepository>,
}

impl Repositories {
    fn from_store<S>(store: S) -> Self
    where
        S: NamespaceRepository + ElementRepository + InviteRepository + 'static,
    {
        let store = Arc::new(store);
        Self {
            namespaces: store.clone(),
            elements: store.clone(),
            invites: store,
        }
    }

    pub fn in_memory() -> Self {
        Self::from_store(InMemoryStore::new())
    }

    pub fn postgres(store: PostgresStore) -> Self {
        Self::from_store(store)
    }
}
