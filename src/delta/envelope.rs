//! Decoded delta envelope: entity snapshot plus tombstone and drift metadata.

use serde::ser::{Error as _, Serialize, Serializer};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{DeltaError, Result};

/// Wire key marking a tombstone.
pub const REMOVED_KEY: &str = "@removed";

/// Wire key carrying the entity identifier.
pub const ID_KEY: &str = "id";

/// Tombstone details. Present on an envelope iff the payload removed the entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalInfo {
    /// Free-text reason supplied by the server (e.g. `"deleted"`, `"changed"`).
    pub reason: Option<String>,
    /// Identifier of the removed entity.
    pub id: String,
}

/// Shape of the `@removed` sub-object.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RemovedMarker {
    pub reason: Option<String>,
}

/// One decoded delta query item.
#[derive(Debug, Clone, PartialEq)]
pub struct Delta<T> {
    entity: T,
    removed: Option<RemovalInfo>,
    /// Wire keys the entity has no field for, with their raw values.
    modified_properties: Map<String, Value>,
}

impl<T> Delta<T> {
    /// Wrap an existing entity with no removal and no unmapped properties.
    pub fn new(entity: T) -> Self {
        Self {
            entity,
            removed: None,
            modified_properties: Map::new(),
        }
    }

    pub fn entity(&self) -> &T {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut T {
        &mut self.entity
    }

    pub fn into_entity(self) -> T {
        self.entity
    }

    pub fn removed(&self) -> Option<&RemovalInfo> {
        self.removed.as_ref()
    }

    pub fn is_removed(&self) -> bool {
        self.removed.is_some()
    }

    /// Unrecognised wire keys from the most recent decode, keyed by their original name.
    pub fn modified_properties(&self) -> &Map<String, Value> {
        &self.modified_properties
    }

    pub(crate) fn set_removed(&mut self, removed: Option<RemovalInfo>) {
        self.removed = removed;
    }

    pub(crate) fn set_entity(&mut self, entity: T) {
        self.entity = entity;
    }

    pub(crate) fn modified_properties_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.modified_properties
    }
}

impl<T: Default> Default for Delta<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Delta envelopes are decode-only.
///
/// # Errors
/// Always returns `Unsupported`.
pub fn encode<T>(_delta: &Delta<T>) -> Result<Value> {
    Err(DeltaError::Unsupported(
        "delta envelopes are decode-only and cannot be encoded",
    ))
}

impl<T> Serialize for Delta<T> {
    fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Err(S::Error::custom(
            "delta envelopes are decode-only and cannot be encoded",
        ))
    }
}
