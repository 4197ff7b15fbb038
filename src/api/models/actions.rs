//! Update actions accepted by the commerce API's partial-update mutations.
//!
//! Serialized externally tagged with camelCase tags, e.g.
//! `{"changeName": {"name": [{"locale": "en", "value": "A"}]}}`, which is the
//! input shape of `updateTypeDefinition` and `updateCart`.

use super::localized::LocalizedString;
use super::type_definition::FieldDefinitionDraft;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeUpdateAction {
    ChangeName {
        name: LocalizedString,
    },
    SetDescription {
        description: LocalizedString,
    },
    ChangeKey {
        key: String,
    },
    AddFieldDefinition {
        #[serde(rename = "fieldDefinition")]
        field_definition: FieldDefinitionDraft,
    },
    RemoveFieldDefinition {
        #[serde(rename = "fieldName")]
        field_name: String,
    },
}

impl TypeUpdateAction {
    pub fn action_name(&self) -> &'static str {
        match self {
            TypeUpdateAction::ChangeName { .. } => "changeName",
            TypeUpdateAction::SetDescription { .. } => "setDescription",
            TypeUpdateAction::ChangeKey { .. } => "changeKey",
            TypeUpdateAction::AddFieldDefinition { .. } => "addFieldDefinition",
            TypeUpdateAction::RemoveFieldDefinition { .. } => "removeFieldDefinition",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CartUpdateAction {
    SetCountry {
        country: Option<String>,
    },
    AddLineItem {
        sku: String,
        quantity: u64,
    },
    RemoveLineItem {
        #[serde(rename = "lineItemId")]
        line_item_id: String,
    },
    ChangeLineItemQuantity {
        #[serde(rename = "lineItemId")]
        line_item_id: String,
        quantity: u64,
    },
    RemoveCustomLineItem {
        #[serde(rename = "customLineItemId")]
        custom_line_item_id: String,
    },
    ChangeCustomLineItemQuantity {
        #[serde(rename = "customLineItemId")]
        custom_line_item_id: String,
        quantity: u64,
    },
}

impl CartUpdateAction {
    pub fn action_name(&self) -> &'static str {
        match self {
            CartUpdateAction::SetCountry { .. } => "setCountry",
            CartUpdateAction::AddLineItem { .. } => "addLineItem",
            CartUpdateAction::RemoveLineItem { .. } => "removeLineItem",
            CartUpdateAction::ChangeLineItemQuantity { .. } => "changeLineItemQuantity",
            CartUpdateAction::RemoveCustomLineItem { .. } => "removeCustomLineItem",
            CartUpdateAction::ChangeCustomLineItemQuantity { .. } => {
                "changeCustomLineItemQuantity"
            }
        }
    }
}

/// A single partial-update request: entity id, observed version and actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest<A> {
    pub id: String,
    pub version: i64,
    pub actions: Vec<A>,
}

impl<A> UpdateRequest<A> {
    pub fn new(id: impl Into<String>, version: i64, actions: Vec<A>) -> Self {
        Self {
            id: id.into(),
            version,
            actions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
