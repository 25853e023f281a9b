//! Decoding of single delta query objects into [`Delta`] envelopes.
//!
//! Each object takes exactly one of two paths, chosen by the literal `@removed` key:
//! - tombstone: `@removed` plus a required `id`; no field mapping happens
//! - update: known keys are written onto the entity, the rest are kept verbatim
//!   in `modified_properties`

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::{Map, Value};

use super::envelope::{Delta, RemovalInfo, RemovedMarker, ID_KEY, REMOVED_KEY};
use super::property_map::{DeltaEntity, PropertyMap};
use super::registry::PropertyMapRegistry;
use crate::error::{json_type_name, DeltaError, Result};

// ============================================================================
// DecodeOptions
// ============================================================================

/// What happens to previously captured unmapped properties when decoding into an
/// existing envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModifiedPropertiesMode {
    /// Keep only the leftovers of the latest payload.
    #[default]
    Replace,
    /// Keep earlier leftovers; keys in the latest payload overwrite them.
    Merge,
}

/// Options controlling decode behavior.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Default: `Replace`.
    pub modified_properties: ModifiedPropertiesMode,
}

// ============================================================================
// DeltaDecoder
// ============================================================================

/// Decodes delta query objects for entity type `T`.
///
/// Holds a shared handle to `T`'s property map, so it is cheap to clone and can be
/// used from several threads at once. Decodes into the same envelope must be
/// serialized by the caller.
pub struct DeltaDecoder<T> {
    map: Arc<PropertyMap<T>>,
    options: DecodeOptions,
}

impl<T> Clone for DeltaDecoder<T> {
    fn clone(&self) -> Self {
        Self {
            map: Arc::clone(&self.map),
            options: self.options.clone(),
        }
    }
}

impl<T> std::fmt::Debug for DeltaDecoder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeltaDecoder")
            .field("entity", &self.map.entity())
            .field("options", &self.options)
            .finish()
    }
}

impl<T: DeltaEntity> DeltaDecoder<T> {
    /// Create a decoder with default options, building `T`'s property map on first use.
    pub fn new(registry: &PropertyMapRegistry) -> Result<Self> {
        Self::with_options(registry, DecodeOptions::default())
    }

    pub fn with_options(registry: &PropertyMapRegistry, options: DecodeOptions) -> Result<Self> {
        Ok(Self {
            map: registry.get_or_build::<T>()?,
            options,
        })
    }

    pub fn property_map(&self) -> &PropertyMap<T> {
        &self.map
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode one object into a fresh envelope around `T::default()`.
    pub fn decode(&self, value: Value) -> Result<Delta<T>> {
        let mut delta = Delta::default();
        self.decode_into(value, &mut delta)?;
        Ok(delta)
    }

    /// Parse JSON text, then decode it as one object.
    pub fn decode_str(&self, json: &str) -> Result<Delta<T>> {
        let value: Value = serde_json::from_str(json)?;
        self.decode(value)
    }

    /// Decode a sequence of objects, preserving order.
    ///
    /// # Errors
    /// The first failing object aborts the batch with `Item { index, .. }`.
    pub fn decode_all<I>(&self, values: I) -> Result<Vec<Delta<T>>>
    where
        I: IntoIterator<Item = Value>,
    {
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| self.decode(value).map_err(|e| DeltaError::at(index, e)))
            .collect()
    }

    /// Merge one object into an existing envelope.
    ///
    /// Fields present in the payload overwrite the entity's values; fields absent from it
    /// are left alone. On error the envelope is unchanged.
    pub fn decode_into(&self, value: Value, delta: &mut Delta<T>) -> Result<()> {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Err(DeltaError::NotAnObject {
                    found: json_type_name(&other),
                })
            }
        };

        match object.remove(REMOVED_KEY) {
            Some(marker) => self.apply_tombstone(marker, object, delta),
            None => self.apply_update(object, delta),
        }
    }

    /// Merge into a dynamically typed target, which must be a `Delta<T>`.
    pub fn decode_into_any(&self, value: Value, target: &mut dyn Any) -> Result<()> {
        let delta = target
            .downcast_mut::<Delta<T>>()
            .ok_or(DeltaError::EnvelopeMismatch {
                expected: T::TYPE_NAME,
            })?;
        self.decode_into(value, delta)
    }

    fn apply_tombstone(
        &self,
        marker: Value,
        mut object: Map<String, Value>,
        delta: &mut Delta<T>,
    ) -> Result<()> {
        let marker: RemovedMarker = match marker {
            Value::Object(_) => serde_json::from_value(marker).map_err(|e| {
                DeltaError::MalformedTombstone(format!("invalid {REMOVED_KEY}: {e}"))
            })?,
            other => {
                return Err(DeltaError::MalformedTombstone(format!(
                    "{REMOVED_KEY} must be an object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        let id = match object.remove(ID_KEY) {
            Some(Value::String(id)) => id,
            Some(other) => {
                return Err(DeltaError::MalformedTombstone(format!(
                    "tombstone id must be a string, got {}",
                    json_type_name(&other)
                )))
            }
            None => return Err(DeltaError::MissingRemovedId),
        };

        // Surface the id on the entity when it has an id field; nothing else is mapped.
        if let Some(field) = self.map.get(ID_KEY) {
            let mut staged = delta.entity().clone();
            field.set(&mut staged, Value::String(id.clone()))?;
            delta.set_entity(staged);
        }

        tracing::debug!(entity = self.map.entity(), %id, "decoded tombstone");
        delta.set_removed(Some(RemovalInfo {
            reason: marker.reason,
            id,
        }));
        delta.modified_properties_mut().clear();
        Ok(())
    }

    fn apply_update(&self, object: Map<String, Value>, delta: &mut Delta<T>) -> Result<()> {
        let claims = self.claim_keys(&object);

        let mut staged = delta.entity().clone();
        let mut leftovers = Map::new();
        for (key, value) in object {
            match claims.get(&key) {
                Some(&position) => self.map.field_at(position).set(&mut staged, value)?,
                None => {
                    leftovers.insert(key, value);
                }
            }
        }

        tracing::trace!(
            entity = self.map.entity(),
            mapped = claims.len(),
            unmapped = leftovers.len(),
            "decoded update"
        );

        delta.set_entity(staged);
        delta.set_removed(None);
        let modified = delta.modified_properties_mut();
        match self.options.modified_properties {
            ModifiedPropertiesMode::Replace => *modified = leftovers,
            ModifiedPropertiesMode::Merge => modified.extend(leftovers),
        }
        Ok(())
    }

    /// Pick at most one payload key per field: an exact wire-name match first,
    /// otherwise the first key equal to it ignoring case.
    fn claim_keys(&self, object: &Map<String, Value>) -> HashMap<String, usize> {
        let mut claims = HashMap::new();
        let mut claimed = HashSet::new();

        for (position, field) in self.map.iter().enumerate() {
            if object.contains_key(field.wire_name()) {
                claims.insert(field.wire_name().to_string(), position);
                claimed.insert(position);
            }
        }

        for key in object.keys() {
            if claims.contains_key(key) {
                continue;
            }
            if let Some(position) = self.map.position(key) {
                if claimed.insert(position) {
                    claims.insert(key.clone(), position);
                }
            }
        }

        claims
    }
}
