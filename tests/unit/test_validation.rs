//! Unit tests for form validation

use commerce_console_api::models::cart::MAX_ITEM_QUANTITY;
use commerce_console_api::models::type_definition::EnumValue;
use commerce_console_api::models::{
    FieldDefinitionDraft, FieldDefinitionFormValues, FieldType, LocalizedString, Money,
    TextInputHint, TypeFormValues,
};
use commerce_console_api::services::validation::{
    validate_currency_step, validate_field_definition_form, validate_quantity, validate_type_form,
};
use commerce_console_api::storage::MutationError;
use commerce_console_api::storage::error::{ValidationErrors, ValidationKind};
use std::collections::BTreeMap;

fn errors_of(result: Result<(), MutationError>) -> ValidationErrors {
    match result {
        Err(MutationError::Validation(errors)) => errors,
        other => panic!("expected validation error, got {:?}", other),
    }
}

fn name(value: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("en".to_string(), value.to_string())])
}

fn draft(field_name: &str) -> FieldDefinitionDraft {
    FieldDefinitionDraft {
        name: field_name.to_string(),
        label: LocalizedString::new().with("en", "Label"),
        field_type: FieldType::String,
        required: false,
        input_hint: TextInputHint::SingleLine,
    }
}

#[test]
fn test_valid_type_form_passes() {
    let values = TypeFormValues {
        key: "order-extras".to_string(),
        name: name("Order extras"),
        description: BTreeMap::new(),
        field_definitions: vec![draft("gift-note")],
    };
    assert!(validate_type_form(&values).is_ok());
}

#[test]
fn test_type_form_requires_key_and_name() {
    let values = TypeFormValues {
        key: " ".to_string(),
        name: name(""),
        ..Default::default()
    };
    let errors = errors_of(validate_type_form(&values));
    assert!(errors.has("key", ValidationKind::Missing));
    assert!(errors.has("name", ValidationKind::Missing));
}

#[test]
fn test_type_form_rejects_bad_key_format() {
    let values = TypeFormValues {
        key: "has spaces".to_string(),
        name: name("Name"),
        ..Default::default()
    };
    let errors = errors_of(validate_type_form(&values));
    assert!(errors.has("key", ValidationKind::InvalidFormat));
}

#[test]
fn test_type_form_rejects_duplicate_field_names() {
    let values = TypeFormValues {
        key: "k1".to_string(),
        name: name("Name"),
        description: BTreeMap::new(),
        field_definitions: vec![draft("f1"), draft("f1")],
    };
    let errors = errors_of(validate_type_form(&values));
    assert!(errors.has("fieldDefinitions[1].name", ValidationKind::Duplicate));
    assert!(!errors.has("fieldDefinitions[0].name", ValidationKind::Duplicate));
}

#[test]
fn test_field_definition_form_requires_type() {
    let values = FieldDefinitionFormValues {
        name: "f1".to_string(),
        label: name("Label"),
        field_type: None,
        required: false,
        input_hint: TextInputHint::SingleLine,
    };
    let errors = errors_of(validate_field_definition_form(&values));
    assert!(errors.has("type", ValidationKind::Missing));
}

#[test]
fn test_field_definition_form_rejects_duplicate_enum_keys() {
    let values = FieldDefinitionFormValues {
        name: "size".to_string(),
        label: name("Size"),
        field_type: Some(FieldType::Set {
            element_type: Box::new(FieldType::Enum {
                values: vec![
                    EnumValue {
                        key: "s".to_string(),
                        label: "Small".to_string(),
                    },
                    EnumValue {
                        key: "s".to_string(),
                        label: "Smaller".to_string(),
                    },
                ],
            }),
        }),
        required: false,
        input_hint: TextInputHint::SingleLine,
    };
    let errors = errors_of(validate_field_definition_form(&values));
    assert!(errors.has("type.elementType.values", ValidationKind::Duplicate));
}

#[test]
fn test_field_definition_form_rejects_nested_sets() {
    let values = FieldDefinitionFormValues {
        name: "tags".to_string(),
        label: name("Tags"),
        field_type: Some(FieldType::Set {
            element_type: Box::new(FieldType::Set {
                element_type: Box::new(FieldType::String),
            }),
        }),
        required: false,
        input_hint: TextInputHint::SingleLine,
    };
    let errors = errors_of(validate_field_definition_form(&values));
    assert!(errors.has("type.elementType", ValidationKind::InvalidFormat));
}

#[test]
fn test_currency_step_requires_country() {
    let errors = errors_of(validate_currency_step(Some("EUR"), None));
    assert!(errors.has("country", ValidationKind::Missing));

    let errors = errors_of(validate_currency_step(None, Some("de")));
    assert!(errors.has("country", ValidationKind::InvalidFormat));

    assert!(validate_currency_step(None, Some("DE")).is_ok());
}

#[test]
fn test_currency_step_rejects_bad_currency() {
    let errors = errors_of(validate_currency_step(Some("EURO"), Some("DE")));
    assert!(errors.has("currency", ValidationKind::InvalidFormat));
}

#[test]
fn test_zero_quantity_is_out_of_range() {
    let errors = errors_of(validate_quantity(0));
    assert!(errors.has("quantity", ValidationKind::OutOfRange));
    assert!(validate_quantity(3).is_ok());
}

#[test]
fn test_quantity_above_maximum_is_out_of_range() {
    assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
    let errors = errors_of(validate_quantity(MAX_ITEM_QUANTITY + 1));
    assert!(errors.has("quantity", ValidationKind::OutOfRange));
    let errors = errors_of(validate_quantity(u64::MAX));
    assert!(errors.has("quantity", ValidationKind::OutOfRange));
}

#[test]
fn test_money_arithmetic_saturates() {
    let price = Money::new("EUR", 1000);
    assert_eq!(price.times(u64::MAX).cent_amount, i64::MAX);
    assert_eq!(Money::new("EUR", -1000).times(u64::MAX).cent_amount, i64::MIN);
    assert_eq!(Money::new("EUR", i64::MAX).per_unit(1).cent_amount, i64::MAX);
    assert_eq!(Money::new("EUR", i64::MAX).per_unit(u64::MAX).cent_amount, 0);
    assert_eq!(Money::new("EUR", 1001).per_unit(2).cent_amount, 501);
}
