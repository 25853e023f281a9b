//! Static field tables for delta entities and the case-insensitive lookup built from them.
//!
//! An entity declares its settable fields once, as accessor pairs keyed by property name.
//! The wire name of each field is derived from the property name, and a [`PropertyMap`]
//! routes wire keys to fields regardless of their casing.

use std::collections::HashMap;
use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{DeltaError, Result};

type Getter<T> = Box<dyn Fn(&T) -> serde_json::Result<Value> + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, Value) -> serde_json::Result<()> + Send + Sync>;

// ============================================================================
// DeltaEntity
// ============================================================================

/// An entity type that can be decoded from delta query payloads.
///
/// `Default` supplies the blank instance a fresh envelope wraps; `Clone` lets a decode
/// work on a copy and publish it only once every field converted.
pub trait DeltaEntity: Default + Clone + Send + Sync + 'static {
    /// Name used in logs and error messages.
    const TYPE_NAME: &'static str;

    /// Every settable field, including those of embedded base structs.
    fn fields() -> Vec<FieldHandle<Self>>;
}

/// Build a `Vec<FieldHandle<T>>` from `"PropertyName" => field` pairs.
///
/// ```
/// use graph_delta::{delta_fields, DeltaEntity, FieldHandle};
///
/// #[derive(Debug, Default, Clone)]
/// struct Course {
///     title: Option<String>,
/// }
///
/// impl DeltaEntity for Course {
///     const TYPE_NAME: &'static str = "Course";
///
///     fn fields() -> Vec<FieldHandle<Self>> {
///         delta_fields!(Course { "Title" => title })
///     }
/// }
///
/// assert_eq!(Course::fields()[0].wire_name(), "title");
/// ```
#[macro_export]
macro_rules! delta_fields {
    ($entity:ty { $($property:literal => $field:ident),* $(,)? }) => {
        vec![
            $(
                $crate::FieldHandle::<$entity>::new(
                    $property,
                    |entity| &entity.$field,
                    |entity| &mut entity.$field,
                ),
            )*
        ]
    };
}

// ============================================================================
// Wire names
// ============================================================================

/// Derive the wire name of a property: first character lower-cased, rest unchanged.
///
/// `DisplayName` becomes `displayName`. A property already in lower camel case maps to
/// itself. Snake-case names are not converted, so `class_number` never matches the wire
/// key `classNumber`.
pub fn wire_name(property: &str) -> String {
    let mut chars = property.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Case-folded form used for every wire key comparison.
pub(crate) fn fold_key(key: &str) -> String {
    key.to_lowercase()
}

// ============================================================================
// FieldHandle
// ============================================================================

/// Read/write access to one field of `T`, converting through JSON values.
pub struct FieldHandle<T> {
    property: &'static str,
    wire_name: String,
    get: Getter<T>,
    set: Setter<T>,
}

impl<T: 'static> FieldHandle<T> {
    /// Create a handle from a pair of accessors.
    ///
    /// The field's declared type `V` decides how wire values convert: strings into enums
    /// by name, objects into nested structs, `null` into `None` for optional fields.
    pub fn new<V>(property: &'static str, read: fn(&T) -> &V, write: fn(&mut T) -> &mut V) -> Self
    where
        V: Serialize + DeserializeOwned + 'static,
    {
        Self {
            property,
            wire_name: wire_name(property),
            get: Box::new(move |entity: &T| serde_json::to_value(read(entity))),
            set: Box::new(
                move |entity: &mut T, value: Value| -> serde_json::Result<()> {
                    *write(entity) = serde_json::from_value(value)?;
                    Ok(())
                },
            ),
        }
    }

    /// Lift a handle on an embedded struct into a handle on the outer entity.
    pub fn project<U: 'static>(
        self,
        outer: fn(&U) -> &T,
        outer_mut: fn(&mut U) -> &mut T,
    ) -> FieldHandle<U> {
        let FieldHandle {
            property,
            wire_name,
            get,
            set,
        } = self;
        FieldHandle {
            property,
            wire_name,
            get: Box::new(move |entity: &U| get(outer(entity))),
            set: Box::new(move |entity: &mut U, value: Value| set(outer_mut(entity), value)),
        }
    }
}

/// Lift every handle of an embedded struct into the outer entity.
pub fn project_fields<B: 'static, U: 'static>(
    fields: Vec<FieldHandle<B>>,
    outer: fn(&U) -> &B,
    outer_mut: fn(&mut U) -> &mut B,
) -> Vec<FieldHandle<U>> {
    fields
        .into_iter()
        .map(|field| field.project(outer, outer_mut))
        .collect()
}

impl<T> FieldHandle<T> {
    /// Property name as declared by the entity.
    pub fn property(&self) -> &'static str {
        self.property
    }

    /// Lower-camel-case key expected on the wire.
    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    /// Current value of the field as JSON.
    pub fn get(&self, entity: &T) -> Result<Value> {
        (self.get)(entity).map_err(|source| self.type_error(source))
    }

    /// Convert `value` to the field's type and store it.
    ///
    /// On a conversion failure the field keeps its previous value.
    pub fn set(&self, entity: &mut T, value: Value) -> Result<()> {
        (self.set)(entity, value).map_err(|source| self.type_error(source))
    }

    fn type_error(&self, source: serde_json::Error) -> DeltaError {
        DeltaError::FieldType {
            field: self.wire_name.clone(),
            source,
        }
    }
}

impl<T> fmt::Debug for FieldHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHandle")
            .field("property", &self.property)
            .field("wire_name", &self.wire_name)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// PropertyMap
// ============================================================================

/// Case-insensitive wire name → field lookup for one entity type.
///
/// Immutable once built; share it behind an `Arc` (see `PropertyMapRegistry`).
pub struct PropertyMap<T> {
    entity: &'static str,
    /// Declaration order is the order fields are matched during decode.
    fields: Vec<FieldHandle<T>>,
    /// folded wire name → index into `fields`
    index: HashMap<String, usize>,
}

impl<T: DeltaEntity> PropertyMap<T> {
    /// Build the map from the entity's declared field table.
    pub fn build() -> Result<Self> {
        Self::from_fields(T::TYPE_NAME, T::fields())
    }
}

impl<T> PropertyMap<T> {
    /// Build a map from an explicit field list.
    ///
    /// # Errors
    /// `DuplicateField` if two fields share a wire name ignoring case.
    pub fn from_fields(entity: &'static str, fields: Vec<FieldHandle<T>>) -> Result<Self> {
        let mut index = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            if index.insert(fold_key(field.wire_name()), i).is_some() {
                return Err(DeltaError::DuplicateField {
                    entity,
                    wire_name: field.wire_name().to_string(),
                });
            }
        }
        Ok(Self {
            entity,
            fields,
            index,
        })
    }

    /// Entity type name the map was built for.
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Look up the field for a wire key, ignoring case.
    pub fn get(&self, wire_key: &str) -> Option<&FieldHandle<T>> {
        self.index
            .get(&fold_key(wire_key))
            .map(|&i| &self.fields[i])
    }

    /// Position of the field for `wire_key` in declaration order, ignoring case.
    pub(crate) fn position(&self, wire_key: &str) -> Option<usize> {
        self.index.get(&fold_key(wire_key)).copied()
    }

    pub(crate) fn field_at(&self, position: usize) -> &FieldHandle<T> {
        &self.fields[position]
    }

    /// Whether `wire_key` names a known field, ignoring case.
    pub fn contains(&self, wire_key: &str) -> bool {
        self.index.contains_key(&fold_key(wire_key))
    }

    /// Read a field of `entity` by wire key. `None` if the key is unknown.
    pub fn read(&self, entity: &T, wire_key: &str) -> Option<Result<Value>> {
        self.get(wire_key).map(|field| field.get(entity))
    }

    /// Fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldHandle<T>> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> fmt::Debug for PropertyMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMap")
            .field("entity", &self.entity)
            .field("fields", &self.fields)
            .finish()
    }
}
