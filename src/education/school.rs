//! Schools.

use serde::{Deserialize, Serialize};

use super::types::{EducationExternalSource, IdentitySet, PhysicalAddress};
use super::GraphEntity;
use crate::delta::{project_fields, DeltaEntity, FieldHandle};
use crate::delta_fields;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationSchool {
    #[serde(flatten)]
    pub entity: GraphEntity,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub principal_email: Option<String>,
    pub principal_name: Option<String>,
    pub external_principal_id: Option<String>,
    pub lowest_grade: Option<String>,
    pub highest_grade: Option<String>,
    pub school_number: Option<String>,
    pub external_id: Option<String>,
    pub external_source: Option<EducationExternalSource>,
    pub phone: Option<String>,
    pub address: Option<PhysicalAddress>,
    pub created_by: Option<IdentitySet>,
}

impl EducationSchool {
    pub fn id(&self) -> Option<&str> {
        self.entity.id.as_deref()
    }
}

impl DeltaEntity for EducationSchool {
    const TYPE_NAME: &'static str = "EducationSchool";

    fn fields() -> Vec<FieldHandle<Self>> {
        let mut fields = project_fields::<GraphEntity, EducationSchool>(
            GraphEntity::fields(),
            |s| &s.entity,
            |s| &mut s.entity,
        );
        fields.extend(delta_fields!(EducationSchool {
            "DisplayName" => display_name,
            "Description" => description,
            "PrincipalEmail" => principal_email,
            "PrincipalName" => principal_name,
            "ExternalPrincipalId" => external_principal_id,
            "LowestGrade" => lowest_grade,
            "HighestGrade" => highest_grade,
            "SchoolNumber" => school_number,
            "ExternalId" => external_id,
            "ExternalSource" => external_source,
            "Phone" => phone,
            "Address" => address,
            "CreatedBy" => created_by,
        }));
        fields
    }
}
