//! Cart service backing the cart creation wizard.

use super::type_definition_service::UpdateOutcome;
use super::validation::{validate_currency_step, validate_quantity};
use crate::models::{Cart, CartDraft, CartItem, CartUpdateAction, UpdateRequest};
use crate::storage::error::{ValidationErrors, ValidationKind};
use crate::storage::{CommerceBackend, MutationError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_CURRENCY: &str = "EUR";

/// Values of the first wizard step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyStepValues {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "cart", rename_all = "lowercase")]
pub enum CurrencyStepOutcome {
    Created(Cart),
    Updated(Cart),
    Unchanged(Cart),
}

impl CurrencyStepOutcome {
    pub fn cart(&self) -> &Cart {
        match self {
            CurrencyStepOutcome::Created(cart)
            | CurrencyStepOutcome::Updated(cart)
            | CurrencyStepOutcome::Unchanged(cart) => cart,
        }
    }
}

pub type CartUpdateOutcome = UpdateOutcome<Cart, CartUpdateAction>;

/// Service for creating and editing carts.
#[derive(Clone)]
pub struct CartService {
    backend: Arc<dyn CommerceBackend>,
}

impl CartService {
    /// Create a new cart service.
    pub fn new(backend: Arc<dyn CommerceBackend>) -> Self {
        Self { backend }
    }

    pub async fn fetch(&self, id: &str) -> Result<Cart, MutationError> {
        self.backend.fetch_cart(id).await
    }

    /// Submit the currency/country step.
    ///
    /// Without a cart a new one is created. With a cart only the country can
    /// change; the currency is fixed once the cart exists.
    pub async fn submit_currency_step(
        &self,
        cart: Option<&Cart>,
        values: &CurrencyStepValues,
    ) -> Result<CurrencyStepOutcome, MutationError> {
        let currency = values
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let country = values.country.as_deref().map(str::trim);
        validate_currency_step(currency, country)?;

        let Some(cart) = cart else {
            let draft = CartDraft {
                currency: currency.unwrap_or(DEFAULT_CURRENCY).to_string(),
                country: country.map(str::to_string),
                inventory_mode: None,
            };
            let created = self.backend.create_cart(draft).await?;
            info!("Created cart {} ({})", created.id, created.total_price.currency_code);
            return Ok(CurrencyStepOutcome::Created(created));
        };

        if let Some(currency) = currency
            && currency != cart.total_price.currency_code
        {
            let mut errors = ValidationErrors::new();
            errors.add("currency", ValidationKind::ReadOnly);
            return Err(MutationError::Validation(errors));
        }

        let country = country.map(str::to_string);
        if country == cart.country {
            return Ok(CurrencyStepOutcome::Unchanged(cart.clone()));
        }

        let request = UpdateRequest::new(
            cart.id.clone(),
            cart.version,
            vec![CartUpdateAction::SetCountry { country }],
        );
        let updated = self.backend.update_cart(request).await?;
        info!("Updated country of cart {} to {:?}", updated.id, updated.country);
        Ok(CurrencyStepOutcome::Updated(updated))
    }

    /// Apply explicit actions; an empty list sends nothing.
    pub async fn apply(
        &self,
        cart: &Cart,
        actions: Vec<CartUpdateAction>,
    ) -> Result<CartUpdateOutcome, MutationError> {
        if actions.is_empty() {
            return Ok(UpdateOutcome::Unchanged);
        }
        let request = UpdateRequest::new(cart.id.clone(), cart.version, actions.clone());
        let entity = self.backend.update_cart(request).await?;
        Ok(UpdateOutcome::Updated { entity, actions })
    }

    /// Change the quantity of a line item or custom line item.
    pub async fn change_item_quantity(
        &self,
        cart: &Cart,
        item_id: &str,
        quantity: u64,
    ) -> Result<CartUpdateOutcome, MutationError> {
        validate_quantity(quantity)?;
        let item = find_item(cart, item_id)?;
        if item.quantity() == quantity {
            return Ok(UpdateOutcome::Unchanged);
        }
        let action = match item {
            CartItem::Line(line) => CartUpdateAction::ChangeLineItemQuantity {
                line_item_id: line.id.clone(),
                quantity,
            },
            CartItem::Custom(custom) => CartUpdateAction::ChangeCustomLineItemQuantity {
                custom_line_item_id: custom.id.clone(),
                quantity,
            },
        };
        self.apply(cart, vec![action]).await
    }

    /// Remove a line item or custom line item.
    pub async fn remove_item(
        &self,
        cart: &Cart,
        item_id: &str,
    ) -> Result<CartUpdateOutcome, MutationError> {
        let action = match find_item(cart, item_id)? {
            CartItem::Line(line) => CartUpdateAction::RemoveLineItem {
                line_item_id: line.id.clone(),
            },
            CartItem::Custom(custom) => CartUpdateAction::RemoveCustomLineItem {
                custom_line_item_id: custom.id.clone(),
            },
        };
        self.apply(cart, vec![action]).await
    }

    /// Add a product variant by SKU.
    pub async fn add_line_item(
        &self,
        cart: &Cart,
        sku: &str,
        quantity: u64,
    ) -> Result<CartUpdateOutcome, MutationError> {
        let mut errors = ValidationErrors::new();
        if sku.trim().is_empty() {
            errors.add("sku", ValidationKind::Missing);
        }
        if let Err(MutationError::Validation(quantity_errors)) = validate_quantity(quantity) {
            errors.errors.extend(quantity_errors.errors);
        }
        errors.into_result()?;

        self.apply(
            cart,
            vec![CartUpdateAction::AddLineItem {
                sku: sku.trim().to_string(),
                quantity,
            }],
        )
        .await
    }
}

fn find_item<'a>(cart: &'a Cart, item_id: &str) -> Result<CartItem<'a>, MutationError> {
    cart.find_item(item_id)
        .ok_or_else(|| MutationError::not_found("cart-item", item_id))
}
