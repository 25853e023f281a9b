//! Per-entity-type cache of property maps.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::property_map::{DeltaEntity, PropertyMap};
use crate::error::Result;

type Published = Arc<dyn Any + Send + Sync>;

/// Owns one [`PropertyMap`] per entity type, built on first use.
///
/// Lookups take a read lock and clone an `Arc`. A miss builds the map with no lock
/// held, then publishes it under the write lock; if another thread published first,
/// its map is kept and the local build is dropped. Published maps are never mutated.
#[derive(Default)]
pub struct PropertyMapRegistry {
    maps: RwLock<HashMap<TypeId, Published>>,
}

impl PropertyMapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the map for `T`, building and publishing it if this is the first use.
    ///
    /// # Errors
    /// Propagates `DuplicateField` from building the map. Nothing is cached on error.
    pub fn get_or_build<T: DeltaEntity>(&self) -> Result<Arc<PropertyMap<T>>> {
        if let Some(map) = self.get::<T>() {
            return Ok(map);
        }

        let map = PropertyMap::<T>::build()?;
        let fields = map.len();
        let built: Published = Arc::new(map);
        let published = {
            let mut maps = self.maps.write();
            let entry = maps.entry(TypeId::of::<T>()).or_insert_with(|| {
                tracing::debug!(entity = T::TYPE_NAME, fields, "published property map");
                Arc::clone(&built)
            });
            Arc::clone(entry)
        };
        if !Arc::ptr_eq(&published, &built) {
            tracing::debug!(entity = T::TYPE_NAME, "property map already published");
        }

        Ok(downcast::<T>(published))
    }

    /// The map for `T` if it has been built.
    pub fn get<T: DeltaEntity>(&self) -> Option<Arc<PropertyMap<T>>> {
        let map = self.maps.read().get(&TypeId::of::<T>()).cloned()?;
        Some(downcast::<T>(map))
    }

    /// Number of entity types with a published map.
    pub fn len(&self) -> usize {
        self.maps.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.read().is_empty()
    }
}

impl std::fmt::Debug for PropertyMapRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyMapRegistry")
            .field("entities", &self.len())
            .finish()
    }
}

fn downcast<T: DeltaEntity>(map: Published) -> Arc<PropertyMap<T>> {
    // Entries are keyed by `TypeId::of::<T>()` and only ever hold `PropertyMap<T>`.
    match map.downcast::<PropertyMap<T>>() {
        Ok(map) => map,
        Err(_) => unreachable!("property map registry entry has the wrong type"),
    }
}
