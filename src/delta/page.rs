//! One page of a delta query response.
//!
//! A page is `{ "value": [...], "@odata.nextLink"?: ..., "@odata.deltaLink"?: ... }`.
//! Following the links is up to the caller; this module only exposes them.

use serde_json::Value;

use super::decoder::DeltaDecoder;
use super::envelope::Delta;
use super::property_map::DeltaEntity;
use crate::error::{json_type_name, DeltaError, Result};

pub const VALUE_KEY: &str = "value";
pub const NEXT_LINK_KEY: &str = "@odata.nextLink";
pub const DELTA_LINK_KEY: &str = "@odata.deltaLink";

/// Decoded page: items in wire order plus the opaque continuation links.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaPage<T> {
    pub items: Vec<Delta<T>>,
    /// Link to the next page of the same round.
    pub next_link: Option<String>,
    /// Link to resume from on the next round; set on the last page.
    pub delta_link: Option<String>,
}

impl<T> DeltaPage<T> {
    /// True when the server sent no next page.
    pub fn is_last(&self) -> bool {
        self.next_link.is_none()
    }
}

impl<T: DeltaEntity> DeltaDecoder<T> {
    /// Decode a full page response.
    ///
    /// # Errors
    /// `MalformedPage` if `value` is missing or not an array, or a link is not a string.
    /// Item failures are reported as `Item { index, .. }`.
    pub fn decode_page(&self, page: Value) -> Result<DeltaPage<T>> {
        let (items, links) = split_page(page)?;
        Ok(DeltaPage {
            items: self.decode_all(items)?,
            next_link: links.next_link,
            delta_link: links.delta_link,
        })
    }

    /// Parse JSON text, then decode it as a page.
    pub fn decode_page_str(&self, json: &str) -> Result<DeltaPage<T>> {
        let value: Value = serde_json::from_str(json)?;
        self.decode_page(value)
    }
}

/// Continuation links of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PageLinks {
    pub next_link: Option<String>,
    pub delta_link: Option<String>,
}

/// Separate a page into its raw items and links.
pub(crate) fn split_page(page: Value) -> Result<(Vec<Value>, PageLinks)> {
    let mut page = match page {
        Value::Object(page) => page,
        other => {
            return Err(DeltaError::MalformedPage(format!(
                "expected object, got {}",
                json_type_name(&other)
            )))
        }
    };

    let items = match page.remove(VALUE_KEY) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(DeltaError::MalformedPage(format!(
                "{VALUE_KEY} must be an array, got {}",
                json_type_name(&other)
            )))
        }
        None => return Err(DeltaError::MalformedPage(format!("missing {VALUE_KEY}"))),
    };
    let links = PageLinks {
        next_link: take_link(&mut page, NEXT_LINK_KEY)?,
        delta_link: take_link(&mut page, DELTA_LINK_KEY)?,
    };
    Ok((items, links))
}

fn take_link(page: &mut serde_json::Map<String, Value>, key: &str) -> Result<Option<String>> {
    match page.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(link)) => Ok(Some(link)),
        Some(other) => Err(DeltaError::MalformedPage(format!(
            "{key} must be a string, got {}",
            json_type_name(&other)
        ))),
    }
}
