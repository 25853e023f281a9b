//! Single-payload decoding: branch selection, field mapping, overflow capture.

use graph_delta::{
    delta_fields,
    education::{
        EducationClass, EducationExternalSource, EducationGender, EducationRole, EducationUser,
    },
    DeltaDecoder, DeltaEntity, DeltaError, DeltaErrorKind, FieldHandle, PropertyMapRegistry,
};
use serde_json::{json, Value};

// ============================================================================
// Helpers
// ============================================================================

fn class_decoder() -> DeltaDecoder<EducationClass> {
    DeltaDecoder::new(&PropertyMapRegistry::new()).expect("class decoder")
}

fn user_decoder() -> DeltaDecoder<EducationUser> {
    DeltaDecoder::new(&PropertyMapRegistry::new()).expect("user decoder")
}

/// Every recognised class field with a valid value.
fn full_class_payload() -> Value {
    json!({
        "id": "c-1",
        "displayName": "Grade 5 Math",
        "description": "Fractions and decimals",
        "mailNickname": "grade5math",
        "period": "P3",
        "classNumber": "MATH-5",
        "externalName": "Math 5",
        "externalId": "SIS-77",
        "externalSource": "sis",
        "createdBy": {"user": {"id": "admin-1", "displayName": "Admin"}},
        "members": [{"id": "u-1", "primaryRole": "student"}],
        "teachers": [{"id": "u-2", "primaryRole": "teacher"}],
        "schools": [{"id": "s-1", "displayName": "Lincoln Elementary"}]
    })
}

// ============================================================================
// Example scenarios
// ============================================================================

#[test]
fn update_scenario_maps_fields_and_keeps_extra() {
    let delta = class_decoder()
        .decode(json!({
            "displayName": "Grade 5 Math",
            "period": "P3",
            "extraField": "foo"
        }))
        .unwrap();

    assert_eq!(delta.entity().display_name.as_deref(), Some("Grade 5 Math"));
    assert_eq!(delta.entity().period.as_deref(), Some("P3"));
    assert_eq!(
        Value::Object(delta.modified_properties().clone()),
        json!({"extraField": "foo"})
    );
    assert!(delta.removed().is_none());
}

#[test]
fn tombstone_scenario() {
    let delta = class_decoder()
        .decode(json!({"@removed": {"reason": "graduated"}, "id": "abc123"}))
        .unwrap();

    let removed = delta.removed().unwrap();
    assert_eq!(removed.reason.as_deref(), Some("graduated"));
    assert_eq!(removed.id, "abc123");
    assert!(delta.modified_properties().is_empty());
}

// ============================================================================
// Branch exclusivity
// ============================================================================

#[test]
fn tombstone_leaves_entity_default_apart_from_id() {
    let delta = class_decoder()
        .decode(json!({
            "@removed": {"reason": "deleted"},
            "id": "c-9",
            "displayName": "should not map",
            "surprise": [1, 2, 3]
        }))
        .unwrap();

    assert!(delta.is_removed());
    assert!(delta.modified_properties().is_empty());
    let expected = EducationClass {
        entity: graph_delta::education::GraphEntity {
            id: Some("c-9".to_string()),
        },
        ..Default::default()
    };
    assert_eq!(delta.entity(), &expected);
}

#[test]
fn tombstone_without_id_fails() {
    let err = class_decoder()
        .decode(json!({"@removed": {"reason": "deleted"}, "displayName": "x"}))
        .unwrap_err();
    assert_eq!(err.kind(), DeltaErrorKind::MalformedPayload);
    assert!(matches!(err, DeltaError::MissingRemovedId));
}

#[test]
fn removed_key_is_matched_literally() {
    // Only the exact `@removed` key selects the tombstone branch.
    let delta = class_decoder()
        .decode(json!({"@Removed": {"reason": "deleted"}, "id": "c-1"}))
        .unwrap();
    assert!(!delta.is_removed());
    assert_eq!(delta.entity().id(), Some("c-1"));
    assert_eq!(
        delta.modified_properties()["@Removed"],
        json!({"reason": "deleted"})
    );
}

// ============================================================================
// Field mapping
// ============================================================================

#[test]
fn full_payload_maps_every_field() {
    let delta = class_decoder().decode(full_class_payload()).unwrap();
    let class = delta.entity();

    assert!(delta.modified_properties().is_empty());
    assert_eq!(class.id(), Some("c-1"));
    assert_eq!(class.description.as_deref(), Some("Fractions and decimals"));
    assert_eq!(class.mail_nickname.as_deref(), Some("grade5math"));
    assert_eq!(class.class_number.as_deref(), Some("MATH-5"));
    assert_eq!(class.external_name.as_deref(), Some("Math 5"));
    assert_eq!(class.external_id.as_deref(), Some("SIS-77"));
    assert_eq!(class.external_source, Some(EducationExternalSource::Sis));
    assert_eq!(
        class
            .created_by
            .as_ref()
            .and_then(|c| c.user.as_ref())
            .and_then(|u| u.display_name.as_deref()),
        Some("Admin")
    );
    assert_eq!(class.members.len(), 1);
    assert_eq!(class.students().count(), 1);
    assert_eq!(class.teachers[0].id(), Some("u-2"));
    assert_eq!(
        class.schools[0].display_name.as_deref(),
        Some("Lincoln Elementary")
    );
}

#[test]
fn nested_objects_and_enums_decode_by_name() {
    let delta = user_decoder()
        .decode(json!({
            "id": "u-1",
            "displayName": "Ada Lovelace",
            "accountEnabled": true,
            "primaryRole": "student",
            "residenceAddress": {"street": "1 Main St", "city": "Springfield", "postalCode": "12345"},
            "student": {"externalId": "S-100", "gender": "female", "graduationYear": "2030"}
        }))
        .unwrap();
    let user = delta.entity();

    assert_eq!(user.id(), Some("u-1"));
    assert_eq!(user.display_name(), Some("Ada Lovelace"));
    assert_eq!(user.user.account_enabled, Some(true));
    assert!(user.is_student());
    assert_eq!(user.external_id(), Some("S-100"));
    assert_eq!(
        user.student.as_ref().and_then(|s| s.gender),
        Some(EducationGender::Female)
    );
    let address = user.residence_address.as_ref().unwrap();
    assert_eq!(address.city.as_deref(), Some("Springfield"));
    assert_eq!(address.postal_code.as_deref(), Some("12345"));
    assert!(delta.modified_properties().is_empty());
}

#[test]
fn unknown_enum_value_is_type_mismatch() {
    let err = user_decoder()
        .decode(json!({"id": "u-1", "primaryRole": "principal"}))
        .unwrap_err();
    assert_eq!(err.kind(), DeltaErrorKind::TypeMismatch);
    assert!(err.to_string().contains("primaryRole"));
}

#[test]
fn wrong_shape_for_nested_object_is_type_mismatch() {
    let err = user_decoder()
        .decode(json!({"mailingAddress": "1 Main St"}))
        .unwrap_err();
    assert_eq!(err.kind(), DeltaErrorKind::TypeMismatch);
    assert!(matches!(err, DeltaError::FieldType { ref field, .. } if field == "mailingAddress"));
}

#[test]
fn future_enum_member_decodes() {
    let delta = user_decoder()
        .decode(json!({"primaryRole": "unknownFutureValue"}))
        .unwrap();
    assert_eq!(
        delta.entity().primary_role,
        Some(EducationRole::UnknownFutureValue)
    );
}

// ============================================================================
// Overflow capture
// ============================================================================

#[test]
fn only_unknown_keys_are_captured_with_raw_values() {
    let mut payload = full_class_payload();
    let object = payload.as_object_mut().unwrap();
    object.insert("grade".to_string(), json!({"level": 5, "tags": ["a", null]}));
    object.insert("term".to_string(), json!(2));
    object.insert("archived".to_string(), json!(null));

    let delta = class_decoder().decode(payload).unwrap();

    assert_eq!(
        Value::Object(delta.modified_properties().clone()),
        json!({
            "grade": {"level": 5, "tags": ["a", null]},
            "term": 2,
            "archived": null
        })
    );
    let map = class_decoder();
    for key in delta.modified_properties().keys() {
        assert!(!map.property_map().contains(key));
    }
}

#[test]
fn derived_only_properties_are_not_mapped() {
    // `students` is computed from members, so it has no field and stays unmapped.
    let delta = class_decoder()
        .decode(json!({"students": [{"id": "u-1"}]}))
        .unwrap();
    assert!(delta.entity().members.is_empty());
    assert_eq!(delta.modified_properties()["students"], json!([{"id": "u-1"}]));
}

// ============================================================================
// Case insensitivity and wire-name derivation
// ============================================================================

#[test]
fn first_letter_case_does_not_matter() {
    let delta = class_decoder()
        .decode(json!({"DisplayName": "Biology", "Period": "P1", "ClassNumber": "BIO-1"}))
        .unwrap();
    assert_eq!(delta.entity().display_name.as_deref(), Some("Biology"));
    assert_eq!(delta.entity().period.as_deref(), Some("P1"));
    assert_eq!(delta.entity().class_number.as_deref(), Some("BIO-1"));
    assert!(delta.modified_properties().is_empty());
}

#[derive(Debug, Default, Clone)]
struct SnakeCaseClass {
    class_number: Option<String>,
    period: Option<String>,
}

impl DeltaEntity for SnakeCaseClass {
    const TYPE_NAME: &'static str = "SnakeCaseClass";

    fn fields() -> Vec<FieldHandle<Self>> {
        delta_fields!(SnakeCaseClass {
            "class_number" => class_number,
            "Period" => period,
        })
    }
}

#[test]
fn property_names_that_are_not_camel_case_fall_through() {
    let decoder = DeltaDecoder::<SnakeCaseClass>::new(&PropertyMapRegistry::new()).unwrap();
    let delta = decoder
        .decode(json!({"classNumber": "MATH-5", "period": "P3"}))
        .unwrap();

    assert!(delta.entity().class_number.is_none());
    assert_eq!(delta.entity().period.as_deref(), Some("P3"));
    assert_eq!(delta.modified_properties()["classNumber"], json!("MATH-5"));
}

// ============================================================================
// Malformed input and encoding
// ============================================================================

#[test]
fn non_object_payloads_are_malformed() {
    let decoder = class_decoder();
    for payload in [json!(null), json!(1), json!("x"), json!([{}])] {
        let err = decoder.decode(payload).unwrap_err();
        assert_eq!(err.kind(), DeltaErrorKind::MalformedPayload);
    }
}

#[test]
fn text_payload_decodes() {
    let delta = class_decoder()
        .decode_str(r#"{"displayName":"Art","room":"B12"}"#)
        .unwrap();
    assert_eq!(delta.entity().display_name.as_deref(), Some("Art"));
    assert_eq!(delta.modified_properties()["room"], json!("B12"));
}

#[test]
fn encoding_is_unsupported() {
    let delta = class_decoder().decode(json!({"period": "P1"})).unwrap();
    let err = graph_delta::encode(&delta).unwrap_err();
    assert_eq!(err.kind(), DeltaErrorKind::UnsupportedOperation);
    assert!(serde_json::to_value(&delta).is_err());
}
