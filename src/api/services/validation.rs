//! Local structural checks run before any action is synthesized.

use crate::models::cart::MAX_ITEM_QUANTITY;
use crate::models::localized::is_blank;
use crate::models::{FieldDefinitionFormValues, FieldType, LocalizedString, TypeFormValues};
use crate::storage::error::{ValidationErrors, ValidationKind};
use crate::storage::MutationError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{2,256}$").expect("valid key pattern"));

static FIELD_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{2,36}$").expect("valid field name pattern"));

static COUNTRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("valid country pattern"));

static CURRENCY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid currency pattern"));

/// Validate the type details form.
pub fn validate_type_form(values: &TypeFormValues) -> Result<(), MutationError> {
    let mut errors = ValidationErrors::new();

    check_key(&mut errors, "key", &values.key);
    if LocalizedString::from(&values.name).is_empty() {
        errors.add("name", ValidationKind::Missing);
    }

    let mut seen = HashSet::new();
    for (index, definition) in values.field_definitions.iter().enumerate() {
        let field = format!("fieldDefinitions[{}].name", index);
        if is_blank(&definition.name) {
            errors.add(field, ValidationKind::Missing);
        } else if !FIELD_NAME_PATTERN.is_match(&definition.name) {
            errors.add(field, ValidationKind::InvalidFormat);
        } else if !seen.insert(definition.name.as_str()) {
            errors.add(field, ValidationKind::Duplicate);
        }
        if definition.label.is_empty() {
            errors.add(
                format!("fieldDefinitions[{}].label", index),
                ValidationKind::Missing,
            );
        }
    }

    errors.into_result()
}

/// Validate the "new field definition" form.
pub fn validate_field_definition_form(
    values: &FieldDefinitionFormValues,
) -> Result<(), MutationError> {
    let mut errors = ValidationErrors::new();

    if is_blank(&values.name) {
        errors.add("name", ValidationKind::Missing);
    } else if !FIELD_NAME_PATTERN.is_match(&values.name) {
        errors.add("name", ValidationKind::InvalidFormat);
    }
    if LocalizedString::from(&values.label).is_empty() {
        errors.add("label", ValidationKind::Missing);
    }
    match &values.field_type {
        None => errors.add("type", ValidationKind::Missing),
        Some(field_type) => check_field_type(&mut errors, "type", field_type),
    }

    errors.into_result()
}

fn check_field_type(errors: &mut ValidationErrors, field: &str, field_type: &FieldType) {
    match field_type {
        FieldType::Enum { values } => {
            let mut keys = HashSet::new();
            if values.iter().any(|v| !keys.insert(v.key.as_str())) {
                errors.add(format!("{}.values", field), ValidationKind::Duplicate);
            }
        }
        FieldType::LocalizedEnum { values } => {
            let mut keys = HashSet::new();
            if values.iter().any(|v| !keys.insert(v.key.as_str())) {
                errors.add(format!("{}.values", field), ValidationKind::Duplicate);
            }
        }
        FieldType::Reference { reference_type_id } => {
            if is_blank(reference_type_id) {
                errors.add(format!("{}.referenceTypeId", field), ValidationKind::Missing);
            }
        }
        FieldType::Set { element_type } => {
            if matches!(element_type.as_ref(), FieldType::Set { .. }) {
                errors.add(format!("{}.elementType", field), ValidationKind::InvalidFormat);
            } else {
                check_field_type(errors, &format!("{}.elementType", field), element_type);
            }
        }
        FieldType::Boolean
        | FieldType::Number
        | FieldType::String
        | FieldType::LocalizedString
        | FieldType::Money
        | FieldType::Date
        | FieldType::Time
        | FieldType::DateTime => {}
    }
}

fn check_key(errors: &mut ValidationErrors, field: &str, key: &str) {
    if is_blank(key) {
        errors.add(field, ValidationKind::Missing);
    } else if !KEY_PATTERN.is_match(key) {
        errors.add(field, ValidationKind::InvalidFormat);
    }
}

/// Validate the first cart wizard step.
pub fn validate_currency_step(
    currency: Option<&str>,
    country: Option<&str>,
) -> Result<(), MutationError> {
    let mut errors = ValidationErrors::new();

    match country {
        None => errors.add("country", ValidationKind::Missing),
        Some(c) if is_blank(c) => errors.add("country", ValidationKind::Missing),
        Some(c) if !COUNTRY_PATTERN.is_match(c) => {
            errors.add("country", ValidationKind::InvalidFormat)
        }
        Some(_) => {}
    }
    if let Some(currency) = currency.filter(|c| !is_blank(c))
        && !CURRENCY_PATTERN.is_match(currency)
    {
        errors.add("currency", ValidationKind::InvalidFormat);
    }

    errors.into_result()
}

pub fn validate_quantity(quantity: u64) -> Result<(), MutationError> {
    let mut errors = ValidationErrors::new();
    if quantity == 0 || quantity > MAX_ITEM_QUANTITY {
        errors.add("quantity", ValidationKind::OutOfRange);
    }
    errors.into_result()
}
