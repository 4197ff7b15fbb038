//! Snapshot normalizer.
//!
//! Brings a fetched type definition and the submitted form values into the
//! same shape so the action synthesizer can compare them field by field.

use crate::models::{FieldDefinitionDraft, LocalizedString, TypeDefinition, TypeFormValues};
use serde::{Deserialize, Serialize};

/// Canonical shape of a type definition, independent of its source.
///
/// Localized values are [`LocalizedString`]s, which never hold blank values,
/// so a snapshot is always already normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSnapshot {
    pub key: String,
    pub name: LocalizedString,
    pub description: LocalizedString,
    #[serde(default)]
    pub field_definitions: Vec<FieldDefinitionDraft>,
}

impl From<&TypeDefinition> for TypeSnapshot {
    fn from(definition: &TypeDefinition) -> Self {
        Self {
            key: definition.key.clone(),
            name: LocalizedString::from_fields(&definition.name_all_locales),
            description: LocalizedString::from_fields(&definition.description_all_locales),
            field_definitions: definition
                .field_definitions
                .iter()
                .map(FieldDefinitionDraft::from)
                .collect(),
        }
    }
}

impl From<&TypeFormValues> for TypeSnapshot {
    fn from(values: &TypeFormValues) -> Self {
        Self {
            key: values.key.clone(),
            name: LocalizedString::from(&values.name),
            description: LocalizedString::from(&values.description),
            field_definitions: values.field_definitions.clone(),
        }
    }
}

impl From<&TypeSnapshot> for TypeSnapshot {
    fn from(snapshot: &TypeSnapshot) -> Self {
        snapshot.clone()
    }
}

/// Normalize an API entity, form values or an existing snapshot.
pub fn normalize<S: Into<TypeSnapshot>>(source: S) -> TypeSnapshot {
    source.into()
}
