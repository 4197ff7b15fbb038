//! Unit tests for the cart items table

use commerce_console_api::models::cart::{Price, ProductVariant, StoreReference, TaxedItemPrice};
use commerce_console_api::models::{
    Cart, CustomLineItem, InventoryMode, ItemsTableColumn, LineItem, LocalizedField, Money,
    TaxRate,
};
use commerce_console_api::services::items_table::{
    CellContent, CellContext, ColumnOptions, build_items_table, columns_definition,
    currency_symbol, is_tax_included_in_price, render_cell,
};

fn tax_rate(included_in_price: bool) -> TaxRate {
    TaxRate {
        name: "Standard".to_string(),
        amount: 0.19,
        included_in_price,
        country: "DE".to_string(),
    }
}

fn line_item(id: &str, unit: i64, quantity: u64, tax: Option<TaxRate>) -> LineItem {
    let price = Money::new("EUR", unit);
    LineItem {
        id: id.to_string(),
        product_id: Some("product-1".to_string()),
        name_all_locales: vec![
            LocalizedField::new("de", "Becher"),
            LocalizedField::new("en", "Mug"),
        ],
        variant: Some(ProductVariant {
            sku: Some("MUG-1".to_string()),
        }),
        quantity,
        total_price: price.times(quantity),
        taxed_price: Some(TaxedItemPrice {
            total_net: Money::new("EUR", 1681 * quantity as i64),
            total_gross: price.times(quantity),
        }),
        price: Price { value: price },
        tax_rate: tax,
    }
}

fn custom_line_item(id: &str) -> CustomLineItem {
    CustomLineItem {
        id: id.to_string(),
        name_all_locales: vec![LocalizedField::new("en", "Gift wrap")],
        slug: "gift-wrap".to_string(),
        quantity: 1,
        money: Money::new("EUR", 300),
        total_price: Money::new("EUR", 300),
        taxed_price: None,
        tax_rate: None,
    }
}

fn cart(inventory_mode: InventoryMode, tax_included: bool) -> Cart {
    Cart {
        id: "cart-1".to_string(),
        version: 4,
        country: Some("DE".to_string()),
        inventory_mode,
        total_price: Money::new("EUR", 6300),
        line_items: vec![line_item("li-1", 2000, 3, Some(tax_rate(tax_included)))],
        custom_line_items: vec![custom_line_item("cli-1")],
        store: Some(StoreReference {
            id: "store-1".to_string(),
            key: None,
        }),
    }
}

fn keys(options: ColumnOptions) -> Vec<ItemsTableColumn> {
    columns_definition("€", options)
        .into_iter()
        .map(|c| c.key)
        .collect()
}

#[test]
fn test_columns_without_tax_or_inventory() {
    use ItemsTableColumn as C;
    let options = ColumnOptions {
        is_tax_included_in_price: false,
        is_editable: false,
        inventory_mode: InventoryMode::None,
    };
    assert_eq!(
        keys(options),
        vec![
            C::Name,
            C::Price,
            C::Quantity,
            C::SubtotalPrice,
            C::TaxRate,
            C::TotalPrice
        ]
    );
}

#[test]
fn test_columns_with_tax_inventory_and_editing() {
    use ItemsTableColumn as C;
    let options = ColumnOptions {
        is_tax_included_in_price: true,
        is_editable: true,
        inventory_mode: InventoryMode::ReserveOnOrder,
    };
    assert_eq!(
        keys(options),
        vec![
            C::Name,
            C::Inventory,
            C::GrossPrice,
            C::NetPrice,
            C::Quantity,
            C::SubtotalPrice,
            C::TaxRate,
            C::TotalPrice,
            C::Actions
        ]
    );
}

#[test]
fn test_quantity_alignment_depends_on_editing() {
    use commerce_console_api::models::enums::Align;
    let read_only = columns_definition(
        "€",
        ColumnOptions {
            is_tax_included_in_price: false,
            is_editable: false,
            inventory_mode: InventoryMode::None,
        },
    );
    let quantity = read_only
        .iter()
        .find(|c| c.key == ItemsTableColumn::Quantity)
        .unwrap();
    assert_eq!(quantity.align, Some(Align::Right));

    let editable = columns_definition(
        "€",
        ColumnOptions {
            is_tax_included_in_price: false,
            is_editable: true,
            inventory_mode: InventoryMode::None,
        },
    );
    let quantity = editable
        .iter()
        .find(|c| c.key == ItemsTableColumn::Quantity)
        .unwrap();
    assert_eq!(quantity.align, None);
}

#[test]
fn test_currency_symbol_labels() {
    assert_eq!(currency_symbol("EUR"), "€");
    assert_eq!(currency_symbol("USD"), "$");
    assert_eq!(currency_symbol("SEK"), "SEK");

    let columns = columns_definition(
        currency_symbol("GBP"),
        ColumnOptions {
            is_tax_included_in_price: false,
            is_editable: false,
            inventory_mode: InventoryMode::None,
        },
    );
    assert!(columns.iter().any(|c| c.label.contains("(£)")));
}

#[test]
fn test_tax_included_detection() {
    let included = cart(InventoryMode::None, true);
    let excluded = cart(InventoryMode::None, false);
    assert!(is_tax_included_in_price(&included.items()));
    assert!(!is_tax_included_in_price(&excluded.items()));
}

#[test]
fn test_price_cells() {
    let cart = cart(InventoryMode::None, true);
    let item = cart.items()[0];
    let ctx = CellContext {
        cart: &cart,
        locale: "en",
        is_editable: false,
    };

    let cents = |column| match render_cell(item, column, &ctx) {
        CellContent::Money { amount, .. } => amount.cent_amount,
        other => panic!("expected money cell, got {:?}", other),
    };
    assert_eq!(cents(ItemsTableColumn::GrossPrice), 2000);
    assert_eq!(cents(ItemsTableColumn::NetPrice), 1681);
    assert_eq!(cents(ItemsTableColumn::SubtotalPrice), 6000);
    assert_eq!(cents(ItemsTableColumn::TotalPrice), 6000);
}

#[test]
fn test_name_and_tax_cells() {
    let cart = cart(InventoryMode::None, false);
    let item = cart.items()[0];
    let ctx = CellContext {
        cart: &cart,
        locale: "de",
        is_editable: true,
    };

    assert_eq!(
        render_cell(item, ItemsTableColumn::Name, &ctx),
        CellContent::Product {
            name: Some("Becher".to_string()),
            reference: Some("MUG-1".to_string()),
            is_custom: false,
        }
    );
    assert_eq!(
        render_cell(item, ItemsTableColumn::TaxRate, &ctx),
        CellContent::TaxRate {
            name: Some("Standard".to_string()),
            percentage: Some(19.0),
            included_in_price: false,
        }
    );
    assert_eq!(
        render_cell(item, ItemsTableColumn::Quantity, &ctx),
        CellContent::Quantity {
            value: 3,
            editable: true,
        }
    );
}

#[test]
fn test_build_table_rows_follow_item_order() {
    let cart = cart(InventoryMode::TrackOnly, false);
    let table = build_items_table(&cart, true, "en");

    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].item_id, "li-1");
    assert!(!table.rows[0].is_custom);
    assert_eq!(table.rows[1].item_id, "cli-1");
    assert!(table.rows[1].is_custom);
    for row in &table.rows {
        assert_eq!(row.cells.len(), table.columns.len());
    }

    let last = table.rows[1].cells.last().unwrap();
    assert_eq!(
        last,
        &CellContent::RemoveButton {
            item_id: "cli-1".to_string(),
            is_custom: true,
        }
    );
}

#[test]
fn test_money_cell_is_formatted() {
    let cart = cart(InventoryMode::None, false);
    let table = build_items_table(&cart, false, "en");
    let json = serde_json::to_value(&table).unwrap();

    assert_eq!(json["columns"][0]["key"], "name");
    assert_eq!(json["rows"][0]["cells"][1]["kind"], "money");
    assert_eq!(json["rows"][0]["cells"][1]["formatted"], "20.00 EUR");
}
