//! Education classes (sections).

use serde::{Deserialize, Serialize};

use super::school::EducationSchool;
use super::types::{EducationExternalSource, EducationRole, IdentitySet};
use super::user::EducationUser;
use super::GraphEntity;
use crate::delta::{project_fields, DeltaEntity, FieldHandle};
use crate::delta_fields;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationClass {
    #[serde(flatten)]
    pub entity: GraphEntity,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub mail_nickname: Option<String>,
    pub period: Option<String>,
    pub class_number: Option<String>,
    pub external_name: Option<String>,
    pub external_id: Option<String>,
    pub external_source: Option<EducationExternalSource>,
    pub created_by: Option<IdentitySet>,
    #[serde(default)]
    pub members: Vec<EducationUser>,
    #[serde(default)]
    pub teachers: Vec<EducationUser>,
    #[serde(default)]
    pub schools: Vec<EducationSchool>,
}

impl EducationClass {
    pub fn id(&self) -> Option<&str> {
        self.entity.id.as_deref()
    }

    /// Members whose primary role is student.
    pub fn students(&self) -> impl Iterator<Item = &EducationUser> {
        self.members
            .iter()
            .filter(|m| m.primary_role == Some(EducationRole::Student))
    }
}

impl DeltaEntity for EducationClass {
    const TYPE_NAME: &'static str = "EducationClass";

    fn fields() -> Vec<FieldHandle<Self>> {
        let mut fields = project_fields::<GraphEntity, EducationClass>(
            GraphEntity::fields(),
            |c| &c.entity,
            |c| &mut c.entity,
        );
        fields.extend(delta_fields!(EducationClass {
            "DisplayName" => display_name,
            "Description" => description,
            "MailNickname" => mail_nickname,
            "Period" => period,
            "ClassNumber" => class_number,
            "ExternalName" => external_name,
            "ExternalId" => external_id,
            "ExternalSource" => external_source,
            "CreatedBy" => created_by,
            "Members" => members,
            "Teachers" => teachers,
            "Schools" => schools,
        }));
        fields
    }
}
