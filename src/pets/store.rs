//! In-memory pet records.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// Largest page `list` returns.
pub const MAX_LIMIT: usize = 100;

/// A stored pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
}

/// Payload for creating a pet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug)]
struct Inner {
    pets: BTreeMap<i64, Pet>,
    next_id: i64,
}

#[derive(Debug)]
pub struct PetStore {
    inner: RwLock<Inner>,
}

impl PetStore {
    /// An empty store whose first id is 1.
    pub fn empty() -> Self {
        Self {
            inner: RwLock::new(Inner {
                pets: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// The store with its two seed records.
    pub fn seeded() -> Self {
        let store = Self::empty();
        store.create(NewPet { name: "Fluffy".into(), tag: "cat".into() });
        store.create(NewPet { name: "Rex".into(), tag: "dog".into() });
        store
    }

    /// Pets ordered by id, at most `limit` (capped at [`MAX_LIMIT`]).
    pub fn list(&self, limit: Option<usize>) -> Vec<Pet> {
        let limit = limit.filter(|l| *l > 0).unwrap_or(MAX_LIMIT).min(MAX_LIMIT);
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.pets.values().take(limit).cloned().collect()
    }

    /// Store a pet under the next id.
    pub fn create(&self, new: NewPet) -> Pet {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let pet = Pet {
            id: inner.next_id,
            name: new.name,
            tag: new.tag,
        };
        inner.next_id += 1;
        inner.pets.insert(pet.id, pet.clone());
        pet
    }

    pub fn get(&self, id: i64) -> Option<Pet> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.pets.get(&id).cloned()
    }
}

impl Default for PetStore {
    fn default() -> Self {
        Self::seeded()
    }
}
