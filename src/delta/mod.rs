//! Delta query decoding: envelopes, property maps, and the decoder.

pub mod accumulator;
pub mod decoder;
pub mod envelope;
pub mod page;
pub mod property_map;
pub mod registry;

pub use accumulator::DeltaAccumulator;
pub use decoder::{DecodeOptions, DeltaDecoder, ModifiedPropertiesMode};
pub use envelope::{encode, Delta, RemovalInfo, ID_KEY, REMOVED_KEY};
pub use page::{DeltaPage, DELTA_LINK_KEY, NEXT_LINK_KEY, VALUE_KEY};
pub use property_map::{project_fields, wire_name, DeltaEntity, FieldHandle, PropertyMap};
pub use registry::PropertyMapRegistry;
