use thiserror::Error;

/// Broad classification of a [`DeltaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaErrorKind {
    /// The payload does not follow the delta protocol.
    MalformedPayload,
    /// A value cannot be placed where it was asked to go.
    TypeMismatch,
    /// The caller asked for something this crate never does (encoding).
    UnsupportedOperation,
    /// An entity's field table is inconsistent.
    InvalidSchema,
}

#[derive(Debug, Error)]
pub enum DeltaError {
    #[error("Malformed delta payload: expected object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("Malformed delta payload: tombstone is missing id")]
    MissingRemovedId,

    #[error("Malformed delta payload: {0}")]
    MalformedTombstone(String),

    #[error("Malformed delta page: {0}")]
    MalformedPage(String),

    #[error("Type mismatch: merge target is not a Delta<{expected}>")]
    EnvelopeMismatch { expected: &'static str },

    #[error("Type mismatch for field {field}: {source}")]
    FieldType {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate wire field {wire_name} on {entity}")]
    DuplicateField {
        entity: &'static str,
        wire_name: String,
    },

    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("Item {index}: {source}")]
    Item {
        index: usize,
        #[source]
        source: Box<DeltaError>,
    },

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl DeltaError {
    pub fn kind(&self) -> DeltaErrorKind {
        match self {
            DeltaError::NotAnObject { .. }
            | DeltaError::MissingRemovedId
            | DeltaError::MalformedTombstone(_)
            | DeltaError::MalformedPage(_)
            | DeltaError::InvalidJson(_) => DeltaErrorKind::MalformedPayload,
            DeltaError::EnvelopeMismatch { .. } | DeltaError::FieldType { .. } => {
                DeltaErrorKind::TypeMismatch
            }
            DeltaError::Unsupported(_) => DeltaErrorKind::UnsupportedOperation,
            DeltaError::DuplicateField { .. } => DeltaErrorKind::InvalidSchema,
            DeltaError::Item { source, .. } => source.kind(),
        }
    }

    pub(crate) fn at(index: usize, source: DeltaError) -> Self {
        DeltaError::Item {
            index,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeltaError>;

/// Name of a JSON value's variant, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
