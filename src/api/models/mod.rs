// Models module - contains type definitions, carts, localized values and update actions

pub mod actions;
pub mod cart;
#[path = "enums.rs"]
pub mod enums;
pub mod localized;
pub mod type_definition;

pub use actions::{CartUpdateAction, TypeUpdateAction, UpdateRequest};
pub use cart::{Cart, CartDraft, CartItem, CustomLineItem, LineItem, Money, TaxRate};
pub use enums::{InventoryMode, ItemsTableColumn, ResourceTypeId, TextInputHint};
pub use localized::{LocalizedField, LocalizedString};
pub use type_definition::{
    FieldDefinition, FieldDefinitionDraft, FieldDefinitionFormValues, FieldType, TypeDefinition,
    TypeDraft, TypeFormValues,
};
