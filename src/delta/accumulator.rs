//! Folding several delta payloads for the same entities into one envelope per id.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::decoder::DeltaDecoder;
use super::envelope::{Delta, ID_KEY, REMOVED_KEY};
use super::page::split_page;
use super::property_map::DeltaEntity;
use crate::error::{DeltaError, Result};

/// Accumulates delta payloads across pages, merging payloads that share an id.
///
/// A later payload for a known id is decoded into that id's envelope, so its fields
/// win and fields it omits keep their earlier values. Envelopes are kept in the
/// order their id was first seen. Payloads without an id are appended on their own.
#[derive(Debug)]
pub struct DeltaAccumulator<T> {
    decoder: DeltaDecoder<T>,
    deltas: Vec<Delta<T>>,
    by_id: HashMap<String, usize>,
    delta_link: Option<String>,
}

impl<T: DeltaEntity> DeltaAccumulator<T> {
    pub fn new(decoder: DeltaDecoder<T>) -> Self {
        Self {
            decoder,
            deltas: Vec::new(),
            by_id: HashMap::new(),
            delta_link: None,
        }
    }

    /// Apply one payload.
    pub fn apply(&mut self, value: Value) -> Result<()> {
        let existing = value
            .as_object()
            .and_then(payload_id)
            .and_then(|id| self.by_id.get(id).copied());

        if let Some(position) = existing {
            return self.decoder.decode_into(value, &mut self.deltas[position]);
        }

        let delta = self.decoder.decode(value)?;
        if let Some(id) = self.entity_id(&delta) {
            self.by_id.insert(id, self.deltas.len());
        }
        self.deltas.push(delta);
        Ok(())
    }

    /// Apply payloads in order. Payloads before a failing one stay applied.
    pub fn apply_all<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = Value>,
    {
        for (index, value) in values.into_iter().enumerate() {
            self.apply(value).map_err(|e| DeltaError::at(index, e))?;
        }
        Ok(())
    }

    /// Apply every item of a page response. Returns the page's next link, if any.
    ///
    /// A delta link on the page is remembered and available from [`Self::delta_link`].
    pub fn apply_page(&mut self, page: Value) -> Result<Option<String>> {
        let (items, links) = split_page(page)?;
        self.apply_all(items)?;
        if links.delta_link.is_some() {
            self.delta_link = links.delta_link;
        }
        Ok(links.next_link)
    }

    /// Delta link of the most recent page that carried one.
    pub fn delta_link(&self) -> Option<&str> {
        self.delta_link.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&Delta<T>> {
        self.by_id.get(id).map(|&i| &self.deltas[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Delta<T>> {
        self.deltas.iter()
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Ids of entities whose latest payload was a tombstone, in first-seen order.
    pub fn removed_ids(&self) -> Vec<&str> {
        self.deltas
            .iter()
            .filter_map(|d| d.removed().map(|r| r.id.as_str()))
            .collect()
    }

    pub fn into_deltas(self) -> Vec<Delta<T>> {
        self.deltas
    }

    fn entity_id(&self, delta: &Delta<T>) -> Option<String> {
        if let Some(removed) = delta.removed() {
            return Some(removed.id.clone());
        }
        match self.decoder.property_map().read(delta.entity(), ID_KEY)? {
            Ok(Value::String(id)) => Some(id),
            _ => None,
        }
    }
}

/// Id carried by a raw payload: the exact `id` key for tombstones, otherwise
/// `id` matched ignoring case.
fn payload_id(object: &Map<String, Value>) -> Option<&str> {
    let exact = object.get(ID_KEY);
    let value = if object.contains_key(REMOVED_KEY) {
        exact
    } else {
        exact.or_else(|| {
            object
                .iter()
                .find(|(key, _)| key.to_lowercase() == ID_KEY)
                .map(|(_, value)| value)
        })
    };
    value.and_then(Value::as_str)
}
