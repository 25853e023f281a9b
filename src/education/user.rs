//! Directory users and their education extension.

use serde::{Deserialize, Serialize};

use super::class::EducationClass;
use super::school::EducationSchool;
use super::types::{
    EducationExternalSource, EducationRole, EducationStudent, EducationTeacher, IdentitySet,
    PhysicalAddress,
};
use super::GraphEntity;
use crate::delta::{project_fields, DeltaEntity, FieldHandle};
use crate::delta_fields;

/// Directory user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(flatten)]
    pub entity: GraphEntity,
    pub account_enabled: Option<bool>,
    pub display_name: Option<String>,
    pub given_name: Option<String>,
    pub surname: Option<String>,
    pub mail: Option<String>,
    pub mail_nickname: Option<String>,
    pub mobile_phone: Option<String>,
    pub user_principal_name: Option<String>,
}

impl DeltaEntity for User {
    const TYPE_NAME: &'static str = "User";

    fn fields() -> Vec<FieldHandle<Self>> {
        let mut fields = project_fields::<GraphEntity, User>(
            GraphEntity::fields(),
            |u| &u.entity,
            |u| &mut u.entity,
        );
        fields.extend(delta_fields!(User {
            "AccountEnabled" => account_enabled,
            "DisplayName" => display_name,
            "GivenName" => given_name,
            "Surname" => surname,
            "Mail" => mail,
            "MailNickname" => mail_nickname,
            "MobilePhone" => mobile_phone,
            "UserPrincipalName" => user_principal_name,
        }));
        fields
    }
}

/// User as seen by the education service: a directory user plus school data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationUser {
    #[serde(flatten)]
    pub user: User,
    pub primary_role: Option<EducationRole>,
    pub middle_name: Option<String>,
    pub external_source: Option<EducationExternalSource>,
    pub residence_address: Option<PhysicalAddress>,
    pub mailing_address: Option<PhysicalAddress>,
    pub student: Option<EducationStudent>,
    pub teacher: Option<EducationTeacher>,
    pub created_by: Option<IdentitySet>,
    #[serde(default)]
    pub classes: Vec<EducationClass>,
    #[serde(default)]
    pub schools: Vec<EducationSchool>,
}

impl EducationUser {
    pub fn id(&self) -> Option<&str> {
        self.user.entity.id.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.user.display_name.as_deref()
    }

    pub fn is_student(&self) -> bool {
        self.primary_role == Some(EducationRole::Student)
    }

    pub fn is_teacher(&self) -> bool {
        self.primary_role == Some(EducationRole::Teacher)
    }

    /// SIS id from the student or teacher record, chosen by primary role.
    pub fn external_id(&self) -> Option<&str> {
        if self.is_student() {
            self.student.as_ref()?.external_id.as_deref()
        } else {
            self.teacher.as_ref()?.external_id.as_deref()
        }
    }
}

impl DeltaEntity for EducationUser {
    const TYPE_NAME: &'static str = "EducationUser";

    fn fields() -> Vec<FieldHandle<Self>> {
        let mut fields = project_fields::<User, EducationUser>(
            User::fields(),
            |u| &u.user,
            |u| &mut u.user,
        );
        fields.extend(delta_fields!(EducationUser {
            "PrimaryRole" => primary_role,
            "MiddleName" => middle_name,
            "ExternalSource" => external_source,
            "ResidenceAddress" => residence_address,
            "MailingAddress" => mailing_address,
            "Student" => student,
            "Teacher" => teacher,
            "CreatedBy" => created_by,
            "Classes" => classes,
            "Schools" => schools,
        }));
        fields
    }
}
