use super::enums::InventoryMode;
use super::localized::{LocalizedField, LocalizedString};
use serde::{Deserialize, Serialize};

/// Largest quantity a single line item may carry.
pub const MAX_ITEM_QUANTITY: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub currency_code: String,
    pub cent_amount: i64,
    #[serde(default = "default_fraction_digits")]
    pub fraction_digits: u32,
}

fn default_fraction_digits() -> u32 {
    2
}

impl Money {
    pub fn new(currency_code: impl Into<String>, cent_amount: i64) -> Self {
        Self {
            currency_code: currency_code.into(),
            cent_amount,
            fraction_digits: default_fraction_digits(),
        }
    }

    pub fn times(&self, quantity: u64) -> Money {
        Money {
            cent_amount: self
                .cent_amount
                .saturating_mul(i64::try_from(quantity).unwrap_or(i64::MAX)),
            ..self.clone()
        }
    }

    /// Per-unit share of this amount, rounded half away from zero.
    pub fn per_unit(&self, quantity: u64) -> Money {
        if quantity == 0 {
            return self.clone();
        }
        let cents = i128::from(self.cent_amount);
        let q = i128::from(quantity);
        let rounded = (cents * 2 + q * cents.signum()) / (2 * q);
        Money {
            cent_amount: i64::try_from(rounded).unwrap_or(self.cent_amount),
            ..self.clone()
        }
    }

    /// Decimal amount with the currency code, e.g. `12.50 EUR`.
    pub fn format(&self) -> String {
        let digits = self.fraction_digits as usize;
        if digits == 0 {
            return format!("{} {}", self.cent_amount, self.currency_code);
        }
        let divisor = 10_i64.pow(self.fraction_digits);
        let sign = if self.cent_amount < 0 { "-" } else { "" };
        let abs = self.cent_amount.abs();
        format!(
            "{}{}.{:0width$} {}",
            sign,
            abs / divisor,
            abs % divisor,
            self.currency_code,
            width = digits
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRate {
    pub name: String,
    pub amount: f64,
    pub included_in_price: bool,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxedItemPrice {
    pub total_net: Money,
    pub total_gross: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    #[serde(default)]
    pub sku: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub name_all_locales: Vec<LocalizedField>,
    #[serde(default)]
    pub variant: Option<ProductVariant>,
    pub quantity: u64,
    pub price: Price,
    pub total_price: Money,
    #[serde(default)]
    pub taxed_price: Option<TaxedItemPrice>,
    #[serde(default)]
    pub tax_rate: Option<TaxRate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLineItem {
    pub id: String,
    #[serde(default)]
    pub name_all_locales: Vec<LocalizedField>,
    pub slug: String,
    pub quantity: u64,
    pub money: Money,
    pub total_price: Money,
    #[serde(default)]
    pub taxed_price: Option<TaxedItemPrice>,
    #[serde(default)]
    pub tax_rate: Option<TaxRate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreReference {
    pub id: String,
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    pub version: i64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub inventory_mode: InventoryMode,
    pub total_price: Money,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub custom_line_items: Vec<CustomLineItem>,
    #[serde(default)]
    pub store: Option<StoreReference>,
}

impl Cart {
    /// Line items followed by custom line items, in table order.
    pub fn items(&self) -> Vec<CartItem<'_>> {
        self.line_items
            .iter()
            .map(CartItem::Line)
            .chain(self.custom_line_items.iter().map(CartItem::Custom))
            .collect()
    }

    pub fn find_item(&self, item_id: &str) -> Option<CartItem<'_>> {
        self.items().into_iter().find(|item| item.id() == item_id)
    }
}

/// Draft used by `createCart` in the first wizard step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDraft {
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_mode: Option<InventoryMode>,
}

/// Either kind of item shown in the cart items table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CartItem<'a> {
    Line(&'a LineItem),
    Custom(&'a CustomLineItem),
}

impl<'a> CartItem<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            CartItem::Line(item) => &item.id,
            CartItem::Custom(item) => &item.id,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, CartItem::Custom(_))
    }

    pub fn quantity(&self) -> u64 {
        match self {
            CartItem::Line(item) => item.quantity,
            CartItem::Custom(item) => item.quantity,
        }
    }

    pub fn name(&self) -> LocalizedString {
        match self {
            CartItem::Line(item) => LocalizedString::from_fields(&item.name_all_locales),
            CartItem::Custom(item) => LocalizedString::from_fields(&item.name_all_locales),
        }
    }

    /// SKU for product line items, slug for custom ones.
    pub fn reference(&self) -> Option<&'a str> {
        match self {
            CartItem::Line(item) => item.variant.as_ref().and_then(|v| v.sku.as_deref()),
            CartItem::Custom(item) => Some(item.slug.as_str()),
        }
    }

    pub fn unit_price(&self) -> &'a Money {
        match self {
            CartItem::Line(item) => &item.price.value,
            CartItem::Custom(item) => &item.money,
        }
    }

    pub fn total_price(&self) -> &'a Money {
        match self {
            CartItem::Line(item) => &item.total_price,
            CartItem::Custom(item) => &item.total_price,
        }
    }

    pub fn taxed_price(&self) -> Option<&'a TaxedItemPrice> {
        match self {
            CartItem::Line(item) => item.taxed_price.as_ref(),
            CartItem::Custom(item) => item.taxed_price.as_ref(),
        }
    }

    pub fn tax_rate(&self) -> Option<&'a TaxRate> {
        match self {
            CartItem::Line(item) => item.tax_rate.as_ref(),
            CartItem::Custom(item) => item.tax_rate.as_ref(),
        }
    }
}
