//! Education entities (schools, classes, users) decodable from delta payloads.

mod class;
mod school;
mod types;
mod user;

use serde::{Deserialize, Serialize};

use crate::delta::{DeltaEntity, FieldHandle};
use crate::delta_fields;

pub use class::EducationClass;
pub use school::EducationSchool;
pub use types::{
    EducationExternalSource, EducationGender, EducationRole, EducationStudent, EducationTeacher,
    Identity, IdentitySet, PhysicalAddress,
};
pub use user::{EducationUser, User};

/// Fields every graph entity carries. Embedded (flattened) in the concrete entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEntity {
    pub id: Option<String>,
}

impl DeltaEntity for GraphEntity {
    const TYPE_NAME: &'static str = "GraphEntity";

    fn fields() -> Vec<FieldHandle<Self>> {
        delta_fields!(GraphEntity { "Id" => id })
    }
}
