//! Decoding of delta query payloads from a directory/education graph service.
//!
//! Each JSON object in a delta page is decoded into a [`Delta<T>`]: either a tombstone
//! (`@removed` plus `id`) or a field update. Update keys the entity type knows are
//! written onto a typed `T`; unknown keys are kept verbatim in
//! [`Delta::modified_properties`] so schema drift is visible without losing data.
//!
//! Fetching pages, following continuation links, and authentication are the caller's
//! job. This crate only turns JSON into typed deltas.

pub mod delta;
pub mod education;
pub mod error;

pub use delta::{
    encode, project_fields, wire_name, DecodeOptions, Delta, DeltaAccumulator, DeltaDecoder,
    DeltaEntity, DeltaPage, FieldHandle, ModifiedPropertiesMode, PropertyMap,
    PropertyMapRegistry, RemovalInfo,
};
pub use error::{DeltaError, DeltaErrorKind, Result};
