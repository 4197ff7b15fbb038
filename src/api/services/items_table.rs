//! Cart items table: column selection and per-cell content.

use crate::models::enums::Align;
use crate::models::{Cart, CartItem, InventoryMode, ItemsTableColumn, Money};
use serde::Serialize;

/// Inputs that decide which columns are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnOptions {
    pub is_tax_included_in_price: bool,
    pub is_editable: bool,
    pub inventory_mode: InventoryMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDefinition {
    pub key: ItemsTableColumn,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
}

impl ColumnDefinition {
    fn new(key: ItemsTableColumn, label: impl Into<String>, align: Option<Align>) -> Self {
        Self {
            key,
            label: label.into(),
            align,
        }
    }
}

/// What a single table cell shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CellContent {
    Product {
        name: Option<String>,
        reference: Option<String>,
        is_custom: bool,
    },
    Inventory {
        mode: InventoryMode,
        store_id: Option<String>,
    },
    Money {
        amount: Money,
        formatted: String,
    },
    Quantity {
        value: u64,
        editable: bool,
    },
    TaxRate {
        name: Option<String>,
        percentage: Option<f64>,
        included_in_price: bool,
    },
    RemoveButton {
        item_id: String,
        is_custom: bool,
    },
}

impl CellContent {
    fn money(amount: Money) -> Self {
        let formatted = amount.format();
        CellContent::Money { amount, formatted }
    }
}

/// Context shared by every cell of the table.
#[derive(Debug, Clone)]
pub struct CellContext<'a> {
    pub cart: &'a Cart,
    pub locale: &'a str,
    pub is_editable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsTableRow {
    pub item_id: String,
    pub is_custom: bool,
    pub cells: Vec<CellContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemsTable {
    pub columns: Vec<ColumnDefinition>,
    pub rows: Vec<ItemsTableRow>,
}

/// Whether any item's tax rate is included in its price.
pub fn is_tax_included_in_price(items: &[CartItem<'_>]) -> bool {
    items
        .iter()
        .any(|item| item.tax_rate().is_some_and(|rate| rate.included_in_price))
}

/// Symbol for the common currencies, the code itself otherwise.
pub fn currency_symbol(currency_code: &str) -> &str {
    match currency_code {
        "EUR" => "€",
        "USD" | "AUD" | "CAD" | "NZD" => "$",
        "GBP" => "£",
        "JPY" | "CNY" => "¥",
        "CHF" => "CHF",
        other => other,
    }
}

/// Columns of the items table, in display order.
pub fn columns_definition(currency_symbol: &str, options: ColumnOptions) -> Vec<ColumnDefinition> {
    use ItemsTableColumn as C;

    let mut columns = vec![ColumnDefinition::new(C::Name, "Product", None)];
    if options.inventory_mode != InventoryMode::None {
        columns.push(ColumnDefinition::new(C::Inventory, "Inventory", None));
    }
    if options.is_tax_included_in_price {
        columns.push(ColumnDefinition::new(
            C::GrossPrice,
            format!("Gross unit price ({})", currency_symbol),
            Some(Align::Right),
        ));
        columns.push(ColumnDefinition::new(
            C::NetPrice,
            format!("Net unit price ({})", currency_symbol),
            Some(Align::Right),
        ));
    } else {
        columns.push(ColumnDefinition::new(
            C::Price,
            format!("Net unit price ({})", currency_symbol),
            Some(Align::Right),
        ));
    }
    columns.push(ColumnDefinition::new(
        C::Quantity,
        "Quantity",
        (!options.is_editable).then_some(Align::Right),
    ));
    columns.push(ColumnDefinition::new(
        C::SubtotalPrice,
        format!("Subtotal ({})", currency_symbol),
        Some(Align::Right),
    ));
    columns.push(ColumnDefinition::new(C::TaxRate, "Tax", Some(Align::Right)));
    columns.push(ColumnDefinition::new(
        C::TotalPrice,
        format!("Total ({})", currency_symbol),
        Some(Align::Right),
    ));
    if options.is_editable {
        columns.push(ColumnDefinition::new(C::Actions, "", None));
    }
    columns
}

/// Content of one cell.
pub fn render_cell(
    item: CartItem<'_>,
    column: ItemsTableColumn,
    ctx: &CellContext<'_>,
) -> CellContent {
    match column {
        ItemsTableColumn::Name => CellContent::Product {
            name: item.name().localize(ctx.locale).map(str::to_string),
            reference: item.reference().map(str::to_string),
            is_custom: item.is_custom(),
        },
        ItemsTableColumn::Inventory => CellContent::Inventory {
            mode: ctx.cart.inventory_mode,
            store_id: ctx.cart.store.as_ref().map(|s| s.id.clone()),
        },
        // Unit price as stored; gross when tax is included in the price
        ItemsTableColumn::Price | ItemsTableColumn::GrossPrice => {
            CellContent::money(item.unit_price().clone())
        }
        ItemsTableColumn::NetPrice => {
            let net = match item.taxed_price() {
                Some(taxed) => taxed.total_net.per_unit(item.quantity()),
                None => item.unit_price().clone(),
            };
            CellContent::money(net)
        }
        ItemsTableColumn::Quantity => CellContent::Quantity {
            value: item.quantity(),
            editable: ctx.is_editable,
        },
        ItemsTableColumn::SubtotalPrice => {
            CellContent::money(item.unit_price().times(item.quantity()))
        }
        ItemsTableColumn::TaxRate => {
            let rate = item.tax_rate();
            CellContent::TaxRate {
                name: rate.map(|r| r.name.clone()),
                percentage: rate.map(|r| (r.amount * 10_000.0).round() / 100.0),
                included_in_price: rate.is_some_and(|r| r.included_in_price),
            }
        }
        ItemsTableColumn::TotalPrice => CellContent::money(item.total_price().clone()),
        ItemsTableColumn::Actions => CellContent::RemoveButton {
            item_id: item.id().to_string(),
            is_custom: item.is_custom(),
        },
    }
}

/// Columns plus one row per line item, then per custom line item.
pub fn build_items_table(cart: &Cart, is_editable: bool, locale: &str) -> ItemsTable {
    let items = cart.items();
    let options = ColumnOptions {
        is_tax_included_in_price: is_tax_included_in_price(&items),
        is_editable,
        inventory_mode: cart.inventory_mode,
    };
    let columns = columns_definition(currency_symbol(&cart.total_price.currency_code), options);
    let ctx = CellContext {
        cart,
        locale,
        is_editable,
    };

    let rows = items
        .iter()
        .map(|item| ItemsTableRow {
            item_id: item.id().to_string(),
            is_custom: item.is_custom(),
            cells: columns
                .iter()
                .map(|column| render_cell(*item, column.key, &ctx))
                .collect(),
        })
        .collect();

    ItemsTable { columns, rows }
}
