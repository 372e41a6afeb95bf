//! # Cart
//!
//! The shopping cart state and the reducer that applies cart commands.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Commands                                    │
//! │                                                                         │
//! │  Shopper Action           CartCommand             State Change          │
//! │  ──────────────           ───────────             ────────────          │
//! │                                                                         │
//! │  Add to Cart ───────────► ADD_ITEM ─────────────► merge or append      │
//! │                                                                         │
//! │  Change Quantity ───────► UPDATE_QUANTITY ──────► line.quantity = n    │
//! │                                                                         │
//! │  Click Remove ──────────► REMOVE_ITEM ──────────► drop matching lines  │
//! │                                                                         │
//! │  Cart Icon ─────────────► OPEN / CLOSE / TOGGLE ► is_open              │
//! │                                                                         │
//! │  Clear Cart ────────────► CLEAR_CART ───────────► items.clear()        │
//! │                                                                         │
//! │  NOTE: Applying a command never fails. `CartCommand::validate` is the   │
//! │        only check, run once where commands enter from the network.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Identity
//! Two lines are the same line iff they share the product `id` AND carry the
//! same set of chosen options. A Red and a Blue of the same product are two
//! lines; adding Red twice is one line with quantity 2.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::validation::{validate_price, validate_required, ValidationResult};
use crate::MAX_LINE_QUANTITY;

// =============================================================================
// Option Selection
// =============================================================================

/// One resolved option on a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ChosenOption {
    /// Option category display name (`"Storage"`).
    pub category: String,

    /// Variant display label (`"256GB"`).
    pub label: String,

    /// Amount this option adds to the unit price.
    pub price_delta: Money,
}

impl ChosenOption {
    pub fn new(category: impl Into<String>, label: impl Into<String>, price_delta: Money) -> Self {
        Self {
            category: category.into(),
            label: label.into(),
            price_delta,
        }
    }
}

/// The options chosen for a cart line, in the product's category order.
///
/// Holds both the `category → label` mapping and the `category → price`
/// mapping in one list, so the two can never disagree about which
/// categories are present. At most one entry per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(from = "Vec<ChosenOption>", into = "Vec<ChosenOption>")]
pub struct OptionSelection(Vec<ChosenOption>);

impl OptionSelection {
    /// Builds a selection. A repeated category keeps its first entry.
    pub fn new(options: Vec<ChosenOption>) -> Self {
        let mut deduped: Vec<ChosenOption> = Vec::with_capacity(options.len());
        for option in options {
            if !deduped.iter().any(|o| o.category == option.category) {
                deduped.push(option);
            }
        }
        OptionSelection(deduped)
    }

    /// No options (plain, non-configurable products).
    pub fn empty() -> Self {
        OptionSelection(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChosenOption> {
        self.0.iter()
    }

    /// `category → label` pairs in category order.
    pub fn selected_options(&self) -> Vec<(&str, &str)> {
        self.0
            .iter()
            .map(|o| (o.category.as_str(), o.label.as_str()))
            .collect()
    }

    /// `category → price delta` pairs in category order.
    pub fn options_pricing(&self) -> Vec<(&str, Money)> {
        self.0
            .iter()
            .map(|o| (o.category.as_str(), o.price_delta))
            .collect()
    }

    /// Sum of all option price deltas.
    pub fn options_total(&self) -> Money {
        self.0.iter().map(|o| o.price_delta).sum()
    }

    /// Label chosen for a category, if any.
    pub fn label_for(&self, category: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|o| o.category == category)
            .map(|o| o.label.as_str())
    }

    /// True when both selections choose the same label for the same set of
    /// categories. Order and price deltas are ignored.
    pub fn same_configuration(&self, other: &OptionSelection) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .all(|o| other.label_for(&o.category) == Some(o.label.as_str()))
    }
}

impl From<Vec<ChosenOption>> for OptionSelection {
    fn from(options: Vec<ChosenOption>) -> Self {
        OptionSelection::new(options)
    }
}

impl From<OptionSelection> for Vec<ChosenOption> {
    fn from(selection: OptionSelection) -> Self {
        selection.0
    }
}

// =============================================================================
// Cart Item
// =============================================================================

fn default_quantity() -> u32 {
    1
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product id.
    pub id: String,

    /// Product name at time of adding.
    pub name: String,

    /// Unit price excluding options.
    pub base_price: Money,

    /// Chosen options. Empty for plain products.
    #[serde(default)]
    pub selection: OptionSelection,

    /// Always at least 1 once stored in a cart.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartItem {
    /// A line with options.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_price: Money,
        selection: OptionSelection,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_price,
            selection,
            quantity,
        }
    }

    /// A line without options.
    pub fn plain(
        id: impl Into<String>,
        name: impl Into<String>,
        base_price: Money,
        quantity: u32,
    ) -> Self {
        Self::new(id, name, base_price, OptionSelection::empty(), quantity)
    }

    /// Rejects a caller-built line whose id or name is blank, or whose base
    /// price or any option delta is outside `0..=MAX_PRICE_CENTS`.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required("id", &self.id)?;
        validate_required("name", &self.name)?;
        validate_price("basePrice", self.base_price)?;
        for option in self.selection.iter() {
            validate_price("priceDelta", option.price_delta)?;
        }
        Ok(())
    }

    /// Base price plus every option delta.
    pub fn unit_price(&self) -> Money {
        self.base_price + self.selection.options_total()
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// The identity rule: same product id and same chosen options.
    pub fn same_line(&self, id: &str, selection: &OptionSelection) -> bool {
        self.id == id && self.selection.same_configuration(selection)
    }

    fn matches(&self, id: &str, selection: Option<&OptionSelection>) -> bool {
        match selection {
            Some(selection) => self.same_line(id, selection),
            None => self.id == id,
        }
    }
}

// =============================================================================
// Cart Commands
// =============================================================================

/// The closed set of cart mutations.
///
/// ## Wire Format
/// ```text
/// { "type": "ADD_ITEM", "payload": { "id": "1", "name": "...", ... } }
/// { "type": "REMOVE_ITEM", "payload": { "id": "1", "selection": [...] } }
/// { "type": "TOGGLE_CART" }
/// ```
///
/// `REMOVE_ITEM` and `UPDATE_QUANTITY` target one configuration when a
/// selection is given and every line of the product when it is omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartCommand {
    AddItem(CartItem),
    RemoveItem {
        id: String,
        #[serde(default)]
        selection: Option<OptionSelection>,
    },
    UpdateQuantity {
        id: String,
        quantity: i64,
        #[serde(default)]
        selection: Option<OptionSelection>,
    },
    OpenCart,
    CloseCart,
    ToggleCart,
    ClearCart,
}

impl CartCommand {
    /// Wire name of the command, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            CartCommand::AddItem(_) => "ADD_ITEM",
            CartCommand::RemoveItem { .. } => "REMOVE_ITEM",
            CartCommand::UpdateQuantity { .. } => "UPDATE_QUANTITY",
            CartCommand::OpenCart => "OPEN_CART",
            CartCommand::CloseCart => "CLOSE_CART",
            CartCommand::ToggleCart => "TOGGLE_CART",
            CartCommand::ClearCart => "CLEAR_CART",
        }
    }

    /// Checks the data a command carries. Only `ADD_ITEM` brings prices in.
    pub fn validate(&self) -> ValidationResult<()> {
        match self {
            CartCommand::AddItem(item) => item.validate(),
            _ => Ok(()),
        }
    }
}

// =============================================================================
// Cart State
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - No two lines share an identity (id + chosen options)
/// - Every line has `1 <= quantity <= MAX_LINE_QUANTITY`
/// - `item_count` and `total` are always derived from `items`
///
/// Both fields are private: [`CartState::apply`] is the only way in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    /// Lines in insertion order (display order).
    items: Vec<CartItem>,

    /// Whether the cart drawer is visible.
    is_open: bool,
}

impl CartState {
    /// An empty, closed cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one command.
    pub fn apply(&mut self, command: CartCommand) {
        match command {
            CartCommand::AddItem(item) => self.add_item(item),
            CartCommand::RemoveItem { id, selection } => {
                self.items.retain(|line| !line.matches(&id, selection.as_ref()));
            }
            CartCommand::UpdateQuantity {
                id,
                quantity,
                selection,
            } => {
                if quantity < 1 {
                    return;
                }
                let quantity = quantity.min(MAX_LINE_QUANTITY as i64) as u32;
                for line in self
                    .items
                    .iter_mut()
                    .filter(|line| line.matches(&id, selection.as_ref()))
                {
                    line.quantity = quantity;
                }
            }
            CartCommand::OpenCart => self.is_open = true,
            CartCommand::CloseCart => self.is_open = false,
            CartCommand::ToggleCart => self.is_open = !self.is_open,
            CartCommand::ClearCart => self.items.clear(),
        }
    }

    fn add_item(&mut self, mut item: CartItem) {
        let incoming = item.quantity.clamp(1, MAX_LINE_QUANTITY);

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.same_line(&item.id, &item.selection))
        {
            line.quantity = line.quantity.saturating_add(incoming).min(MAX_LINE_QUANTITY);
            return;
        }

        item.quantity = incoming;
        self.items.push(item);
    }

    /// Lines in display order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Σ (base price + option deltas) × quantity.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Commands that take `ordered` lines back out of the cart.
    ///
    /// Only what was ordered is removed: a line whose quantity grew since
    /// the order was priced keeps the difference, and lines added since are
    /// untouched. Ordered lines no longer in the cart are skipped.
    pub fn settlement(&self, ordered: &[CartItem]) -> Vec<CartCommand> {
        ordered
            .iter()
            .filter_map(|sold| {
                let line = self
                    .items
                    .iter()
                    .find(|line| line.same_line(&sold.id, &sold.selection))?;
                let selection = Some(sold.selection.clone());

                Some(if line.quantity > sold.quantity {
                    CartCommand::UpdateQuantity {
                        id: sold.id.clone(),
                        quantity: i64::from(line.quantity - sold.quantity),
                        selection,
                    }
                } else {
                    CartCommand::RemoveItem {
                        id: sold.id.clone(),
                        selection,
                    }
                })
            })
            .collect()
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// A cart line with its derived prices, as sent to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(flatten)]
    pub item: CartItem,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Read-only view of the cart including derived totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartLine>,
    pub is_open: bool,
    pub item_count: u32,
    pub total: Money,
}

impl From<&CartState> for CartSnapshot {
    fn from(cart: &CartState) -> Self {
        CartSnapshot {
            items: cart
                .items
                .iter()
                .map(|item| CartLine {
                    unit_price: item.unit_price(),
                    line_total: item.line_total(),
                    item: item.clone(),
                })
                .collect(),
            is_open: cart.is_open,
            item_count: cart.item_count(),
            total: cart.total(),
        }
    }
}
