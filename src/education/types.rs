//! Value types and enumerations shared by the education entities.

use serde::{Deserialize, Serialize};

// ============================================================================
// Enumerations
// ============================================================================

/// Primary role of a user in a school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EducationRole {
    Student,
    Teacher,
    UnknownFutureValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EducationGender {
    Female,
    Male,
    Other,
    UnknownFutureValue,
}

/// Where an entity was provisioned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EducationExternalSource {
    /// School information system sync.
    Sis,
    Manual,
    UnknownFutureValue,
}

// ============================================================================
// Nested value types
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country_or_region: Option<String>,
}

/// Actor reference inside an [`IdentitySet`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

/// Who performed an action: an application, a device, and/or a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySet {
    pub application: Option<Identity>,
    pub device: Option<Identity>,
    pub user: Option<Identity>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationStudent {
    /// `YYYY-MM-DD`, kept as sent.
    pub birth_date: Option<String>,
    pub external_id: Option<String>,
    pub gender: Option<EducationGender>,
    pub grade: Option<String>,
    pub graduation_year: Option<String>,
    pub student_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationTeacher {
    pub external_id: Option<String>,
    pub teacher_number: Option<String>,
}
