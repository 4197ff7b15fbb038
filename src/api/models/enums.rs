use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum InventoryMode {
    #[default]
    None,
    TrackOnly,
    ReserveOnOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TextInputHint {
    #[default]
    SingleLine,
    MultiLine,
}

/// Resource types a custom type definition can extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceTypeId {
    Category,
    Channel,
    Customer,
    Order,
    LineItem,
    CustomLineItem,
    ProductPrice,
    Payment,
    Review,
    ShoppingList,
    Store,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Columns of the cart items table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemsTableColumn {
    Name,
    Inventory,
    GrossPrice,
    NetPrice,
    Price,
    Quantity,
    SubtotalPrice,
    TaxRate,
    TotalPrice,
    Actions,
}
