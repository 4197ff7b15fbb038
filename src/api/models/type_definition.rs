use super::enums::{ResourceTypeId, TextInputHint};
use super::localized::{LocalizedField, LocalizedString};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedEnumValue {
    pub key: String,
    #[serde(alias = "labelAllLocales")]
    pub label: LocalizedString,
}

/// Type of a custom field, tagged by `name` like the API's field type objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum FieldType {
    Boolean,
    Number,
    String,
    LocalizedString,
    Enum {
        #[serde(default)]
        values: Vec<EnumValue>,
    },
    LocalizedEnum {
        #[serde(default)]
        values: Vec<LocalizedEnumValue>,
    },
    Money,
    Date,
    Time,
    DateTime,
    Reference {
        #[serde(rename = "referenceTypeId")]
        reference_type_id: String,
    },
    Set {
        #[serde(rename = "elementType")]
        element_type: Box<FieldType>,
    },
}

impl FieldType {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Boolean => "Boolean",
            FieldType::Number => "Number",
            FieldType::String => "String",
            FieldType::LocalizedString => "LocalizedString",
            FieldType::Enum { .. } => "Enum",
            FieldType::LocalizedEnum { .. } => "LocalizedEnum",
            FieldType::Money => "Money",
            FieldType::Date => "Date",
            FieldType::Time => "Time",
            FieldType::DateTime => "DateTime",
            FieldType::Reference { .. } => "Reference",
            FieldType::Set { .. } => "Set",
        }
    }
}

/// Field definition as fetched from the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default)]
    pub label_all_locales: Vec<LocalizedField>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub input_hint: TextInputHint,
}

/// Field definition as submitted in `addFieldDefinition` and type drafts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinitionDraft {
    pub name: String,
    pub label: LocalizedString,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub input_hint: TextInputHint,
}

impl From<&FieldDefinition> for FieldDefinitionDraft {
    fn from(definition: &FieldDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            label: LocalizedString::from_fields(&definition.label_all_locales),
            field_type: definition.field_type.clone(),
            required: definition.required,
            input_hint: definition.input_hint,
        }
    }
}

impl From<FieldDefinitionDraft> for FieldDefinition {
    fn from(draft: FieldDefinitionDraft) -> Self {
        Self {
            label_all_locales: draft.label.to_fields(),
            name: draft.name,
            field_type: draft.field_type,
            required: draft.required,
            input_hint: draft.input_hint,
        }
    }
}

/// A custom type definition, the versioned entity edited by the type screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefinition {
    pub id: String,
    pub version: i64,
    pub key: String,
    #[serde(default)]
    pub name_all_locales: Vec<LocalizedField>,
    #[serde(default)]
    pub description_all_locales: Vec<LocalizedField>,
    #[serde(default)]
    pub resource_type_ids: Vec<ResourceTypeId>,
    #[serde(default)]
    pub field_definitions: Vec<FieldDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<DateTime<Utc>>,
}

impl TypeDefinition {
    pub fn name(&self) -> LocalizedString {
        LocalizedString::from_fields(&self.name_all_locales)
    }

    pub fn description(&self) -> LocalizedString {
        LocalizedString::from_fields(&self.description_all_locales)
    }

    pub fn field_definition(&self, name: &str) -> Option<&FieldDefinition> {
        self.field_definitions.iter().find(|f| f.name == name)
    }
}

/// Draft used by `createTypeDefinition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDraft {
    pub key: String,
    pub name: LocalizedString,
    #[serde(default)]
    pub description: LocalizedString,
    pub resource_type_ids: Vec<ResourceTypeId>,
    #[serde(default)]
    pub field_definitions: Vec<FieldDefinitionDraft>,
}

/// Values of the type details form.
///
/// Localized inputs keep one entry per project language, including blank ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeFormValues {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: BTreeMap<String, String>,
    #[serde(default)]
    pub description: BTreeMap<String, String>,
    #[serde(default)]
    pub field_definitions: Vec<FieldDefinitionDraft>,
}

impl TypeFormValues {
    /// Initial form values for an existing definition, padded with blank
    /// entries for every project language.
    pub fn from_definition(definition: &TypeDefinition, languages: &[String]) -> Self {
        Self {
            key: definition.key.clone(),
            name: pad_languages(&definition.name(), languages),
            description: pad_languages(&definition.description(), languages),
            field_definitions: definition
                .field_definitions
                .iter()
                .map(FieldDefinitionDraft::from)
                .collect(),
        }
    }
}

fn pad_languages(localized: &LocalizedString, languages: &[String]) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = languages
        .iter()
        .map(|lang| (lang.clone(), String::new()))
        .collect();
    for (locale, value) in localized.iter() {
        map.insert(locale.to_string(), value.to_string());
    }
    map
}

/// Values of the "new field definition" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinitionFormValues {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: BTreeMap<String, String>,
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub input_hint: TextInputHint,
}
