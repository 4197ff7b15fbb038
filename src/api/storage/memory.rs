//! In-memory backend implementation.
//!
//! Used when no remote commerce API is configured and in tests. Applies update
//! actions with the same optimistic locking rules as the remote API.

use super::error::check_version;
use super::{CommerceBackend, FieldDefinitionsByName, MutationError, RemoteError};
use crate::models::{
    Cart, CartDraft, CartUpdateAction, FieldDefinition, LineItem, Money, TypeDefinition,
    TypeDraft, TypeUpdateAction, UpdateRequest,
};
use crate::models::cart::{MAX_ITEM_QUANTITY, Price, ProductVariant};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

const DEFAULT_UNIT_CENT_AMOUNT: i64 = 1000;

#[derive(Default)]
pub struct InMemoryBackend {
    types: RwLock<HashMap<String, TypeDefinition>>,
    carts: RwLock<HashMap<String, Cart>>,
    /// SKU -> unit price in cents for `addLineItem`
    prices: HashMap<String, i64>,
    update_calls: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Known SKUs and their unit prices in cents.
    pub fn with_prices(prices: HashMap<String, i64>) -> Self {
        Self {
            prices,
            ..Self::default()
        }
    }

    pub async fn insert_type_definition(&self, definition: TypeDefinition) {
        self.types
            .write()
            .await
            .insert(definition.id.clone(), definition);
    }

    /// Number of update requests received, successful or not.
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

fn rejected(code: &str, message: String, field: Option<&str>) -> MutationError {
    MutationError::Rejected {
        errors: vec![RemoteError {
            code: code.to_string(),
            message,
            field: field.map(str::to_string),
        }],
    }
}

fn apply_type_action(
    definition: &mut TypeDefinition,
    action: &TypeUpdateAction,
) -> Result<(), MutationError> {
    match action {
        TypeUpdateAction::ChangeName { name } => {
            if name.is_empty() {
                return Err(rejected(
                    "InvalidField",
                    "name must not be empty".to_string(),
                    Some("name"),
                ));
            }
            definition.name_all_locales = name.to_fields();
        }
        TypeUpdateAction::SetDescription { description } => {
            definition.description_all_locales = description.to_fields();
        }
        TypeUpdateAction::ChangeKey { key } => {
            definition.key = key.clone();
        }
        TypeUpdateAction::AddFieldDefinition { field_definition } => {
            if definition.field_definition(&field_definition.name).is_some() {
                return Err(rejected(
                    "DuplicateField",
                    format!(
                        "A field definition with name '{}' already exists",
                        field_definition.name
                    ),
                    Some("name"),
                ));
            }
            definition
                .field_definitions
                .push(FieldDefinition::from(field_definition.clone()));
        }
        TypeUpdateAction::RemoveFieldDefinition { field_name } => {
            if definition.field_definition(field_name).is_none() {
                return Err(rejected(
                    "InvalidOperation",
                    format!("No field definition with name '{}'", field_name),
                    Some("fieldName"),
                ));
            }
            definition.field_definitions.retain(|f| &f.name != field_name);
        }
    }
    Ok(())
}

impl InMemoryBackend {
    fn apply_cart_action(
        &self,
        cart: &mut Cart,
        action: &CartUpdateAction,
    ) -> Result<(), MutationError> {
        match action {
            CartUpdateAction::SetCountry { country } => {
                cart.country = country.clone();
            }
            CartUpdateAction::AddLineItem { sku, quantity } => {
                let unit = *self.prices.get(sku).unwrap_or(&DEFAULT_UNIT_CENT_AMOUNT);
                let currency = cart.total_price.currency_code.clone();
                if let Some(existing) = cart.line_items.iter_mut().find(|item| {
                    item.variant.as_ref().and_then(|v| v.sku.as_deref()) == Some(sku.as_str())
                }) {
                    existing.quantity = existing
                        .quantity
                        .checked_add(*quantity)
                        .filter(|total| *total <= MAX_ITEM_QUANTITY)
                        .ok_or_else(|| {
                            rejected(
                                "InvalidItemQuantity",
                                format!(
                                    "Quantity of '{}' would exceed {}",
                                    sku, MAX_ITEM_QUANTITY
                                ),
                                Some("quantity"),
                            )
                        })?;
                    existing.total_price = existing.price.value.times(existing.quantity);
                } else {
                    let price = Money::new(currency, unit);
                    cart.line_items.push(LineItem {
                        id: Uuid::new_v4().to_string(),
                        product_id: None,
                        name_all_locales: Vec::new(),
                        variant: Some(ProductVariant {
                            sku: Some(sku.clone()),
                        }),
                        quantity: *quantity,
                        total_price: price.times(*quantity),
                        price: Price { value: price },
                        taxed_price: None,
                        tax_rate: None,
                    });
                }
            }
            CartUpdateAction::RemoveLineItem { line_item_id } => {
                let before = cart.line_items.len();
                cart.line_items.retain(|item| &item.id != line_item_id);
                if cart.line_items.len() == before {
                    return Err(line_item_missing(line_item_id));
                }
            }
            CartUpdateAction::ChangeLineItemQuantity {
                line_item_id,
                quantity,
            } => {
                if *quantity == 0 {
                    cart.line_items.retain(|item| &item.id != line_item_id);
                } else {
                    let item = cart
                        .line_items
                        .iter_mut()
                        .find(|item| &item.id == line_item_id)
                        .ok_or_else(|| line_item_missing(line_item_id))?;
                    item.quantity = *quantity;
                    item.total_price = item.price.value.times(*quantity);
                }
            }
            CartUpdateAction::RemoveCustomLineItem { custom_line_item_id } => {
                let before = cart.custom_line_items.len();
                cart.custom_line_items
                    .retain(|item| &item.id != custom_line_item_id);
                if cart.custom_line_items.len() == before {
                    return Err(line_item_missing(custom_line_item_id));
                }
            }
            CartUpdateAction::ChangeCustomLineItemQuantity {
                custom_line_item_id,
                quantity,
            } => {
                if *quantity == 0 {
                    cart.custom_line_items
                        .retain(|item| &item.id != custom_line_item_id);
                } else {
                    let item = cart
                        .custom_line_items
                        .iter_mut()
                        .find(|item| &item.id == custom_line_item_id)
                        .ok_or_else(|| line_item_missing(custom_line_item_id))?;
                    item.quantity = *quantity;
                    item.total_price = item.money.times(*quantity);
                }
            }
        }
        Ok(())
    }
}

fn line_item_missing(id: &str) -> MutationError {
    rejected(
        "InvalidOperation",
        format!("Cart does not contain item '{}'", id),
        None,
    )
}

fn recompute_total(cart: &mut Cart) {
    let total = cart
        .line_items
        .iter()
        .map(|item| item.total_price.cent_amount)
        .chain(cart.custom_line_items.iter().map(|item| item.total_price.cent_amount))
        .fold(0_i64, i64::saturating_add);
    cart.total_price.cent_amount = total;
}

#[async_trait]
impl CommerceBackend for InMemoryBackend {
    async fn fetch_type_definition(&self, id: &str) -> Result<TypeDefinition, MutationError> {
        self.types
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| MutationError::not_found("type-definition", id))
    }

    async fn fetch_type_field_definitions(
        &self,
        id: &str,
        include_names: &[String],
    ) -> Result<FieldDefinitionsByName, MutationError> {
        let definition = self.fetch_type_definition(id).await?;
        let field_definitions = definition
            .field_definitions
            .into_iter()
            .filter(|f| include_names.is_empty() || include_names.contains(&f.name))
            .collect();
        Ok(FieldDefinitionsByName {
            version: definition.version,
            field_definitions,
        })
    }

    async fn create_type_definition(
        &self,
        draft: TypeDraft,
    ) -> Result<TypeDefinition, MutationError> {
        let mut types = self.types.write().await;
        if types.values().any(|t| t.key == draft.key) {
            return Err(rejected(
                "DuplicateField",
                format!("A type definition with key '{}' already exists", draft.key),
                Some("key"),
            ));
        }
        let now = Utc::now();
        let definition = TypeDefinition {
            id: Uuid::new_v4().to_string(),
            version: 1,
            key: draft.key,
            name_all_locales: draft.name.to_fields(),
            description_all_locales: draft.description.to_fields(),
            resource_type_ids: draft.resource_type_ids,
            field_definitions: draft
                .field_definitions
                .into_iter()
                .map(FieldDefinition::from)
                .collect(),
            created_at: Some(now),
            last_modified_at: Some(now),
        };
        info!("Created type definition {} ({})", definition.key, definition.id);
        types.insert(definition.id.clone(), definition.clone());
        Ok(definition)
    }

    async fn update_type_definition(
        &self,
        request: UpdateRequest<TypeUpdateAction>,
    ) -> Result<TypeDefinition, MutationError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut types = self.types.write().await;
        let stored = types
            .get(&request.id)
            .ok_or_else(|| MutationError::not_found("type-definition", &request.id))?;
        check_version("type-definition", &request.id, request.version, stored.version)?;

        // All actions apply or none do
        let mut updated = stored.clone();
        for action in &request.actions {
            apply_type_action(&mut updated, action)?;
        }
        updated.version += 1;
        updated.last_modified_at = Some(Utc::now());
        debug!(
            "Applied {} actions to type definition {}, version {} -> {}",
            request.actions.len(),
            request.id,
            request.version,
            updated.version
        );
        types.insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }

    async fn delete_type_definition(
        &self,
        id: &str,
        version: i64,
    ) -> Result<TypeDefinition, MutationError> {
        let mut types = self.types.write().await;
        let stored = types
            .get(id)
            .ok_or_else(|| MutationError::not_found("type-definition", id))?;
        check_version("type-definition", id, version, stored.version)?;
        let removed = types
            .remove(id)
            .ok_or_else(|| MutationError::not_found("type-definition", id))?;
        info!("Deleted type definition {} ({})", removed.key, removed.id);
        Ok(removed)
    }

    async fn fetch_cart(&self, id: &str) -> Result<Cart, MutationError> {
        self.carts
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| MutationError::not_found("cart", id))
    }

    async fn create_cart(&self, draft: CartDraft) -> Result<Cart, MutationError> {
        let cart = Cart {
            id: Uuid::new_v4().to_string(),
            version: 1,
            country: draft.country,
            inventory_mode: draft.inventory_mode.unwrap_or_default(),
            total_price: Money::new(draft.currency, 0),
            line_items: Vec::new(),
            custom_line_items: Vec::new(),
            store: None,
        };
        info!("Created cart {} in {}", cart.id, cart.total_price.currency_code);
        self.carts
            .write()
            .await
            .insert(cart.id.clone(), cart.clone());
        Ok(cart)
    }

    async fn update_cart(
        &self,
        request: UpdateRequest<CartUpdateAction>,
    ) -> Result<Cart, MutationError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut carts = self.carts.write().await;
        let stored = carts
            .get(&request.id)
            .ok_or_else(|| MutationError::not_found("cart", &request.id))?;
        check_version("cart", &request.id, request.version, stored.version)?;

        let mut updated = stored.clone();
        for action in &request.actions {
            self.apply_cart_action(&mut updated, action)?;
        }
        recompute_total(&mut updated);
        updated.version += 1;
        carts.insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }
}
