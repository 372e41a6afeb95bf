//! # Product Configurator
//!
//! Tracks which variant is chosen in each option category of a product and
//! derives the configured price.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Configurator::new(&descriptor)                                         │
//! │     │  every category starts on its default (or first) variant          │
//! │     ▼                                                                   │
//! │  select("storage", "512gb") ──► Ok / UnknownOption / UnknownVariant     │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  price() = base_price + Σ selected deltas                               │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  add_to_cart_commands(1)                                                │
//! │     └──► [ ADD_ITEM { base_price, selection }, OPEN_CART ]              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart line carries the **base** price plus the resolved options. The
//! cart recomputes the configured price itself, so handing it the configured
//! total would count the options twice.

use crate::cart::{CartCommand, CartItem, ChosenOption, OptionSelection};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{ProductDescriptor, Variant};

/// Selection state for one product.
#[derive(Debug, Clone)]
pub struct Configurator<'a> {
    product: &'a ProductDescriptor,

    /// Selected variant id per category, parallel to `product.options`.
    selected: Vec<Option<String>>,
}

impl<'a> Configurator<'a> {
    /// Starts every category on its default variant.
    pub fn new(product: &'a ProductDescriptor) -> Self {
        let selected = product
            .options
            .iter()
            .map(|category| category.initial_variant().map(|v| v.id.clone()))
            .collect();

        Self { product, selected }
    }

    pub fn product(&self) -> &ProductDescriptor {
        self.product
    }

    /// Chooses a variant. Only enumerated variants are accepted.
    pub fn select(&mut self, category_id: &str, variant_id: &str) -> CoreResult<()> {
        let index = self
            .product
            .options
            .iter()
            .position(|category| category.id == category_id)
            .ok_or_else(|| CoreError::UnknownOption {
                product_id: self.product.id.clone(),
                category: category_id.to_string(),
            })?;

        let category = &self.product.options[index];
        if category.variant(variant_id).is_none() {
            return Err(CoreError::UnknownVariant {
                category: category.id.clone(),
                variant: variant_id.to_string(),
            });
        }

        self.selected[index] = Some(variant_id.to_string());
        Ok(())
    }

    /// Applies several selections, stopping at the first invalid one.
    pub fn select_all<'s>(
        &mut self,
        selections: impl IntoIterator<Item = (&'s str, &'s str)>,
    ) -> CoreResult<()> {
        for (category, variant) in selections {
            self.select(category, variant)?;
        }
        Ok(())
    }

    /// The variant currently chosen in a category.
    pub fn selected_variant(&self, category_id: &str) -> Option<&'a Variant> {
        let product: &'a ProductDescriptor = self.product;
        product
            .options
            .iter()
            .zip(&self.selected)
            .find(|(category, _)| category.id == category_id)
            .and_then(|(category, chosen)| chosen.as_deref().and_then(|id| category.variant(id)))
    }

    /// Base price plus the delta of every selected variant.
    pub fn price(&self) -> Money {
        self.product.base_price + self.resolve().options_total()
    }

    /// Resolves the selection into display labels and deltas, keyed by the
    /// category display name, in category order.
    pub fn resolve(&self) -> OptionSelection {
        let chosen = self
            .product
            .options
            .iter()
            .zip(&self.selected)
            .filter_map(|(category, chosen)| {
                let variant = category.variant(chosen.as_deref()?)?;
                Some(ChosenOption::new(
                    category.name.clone(),
                    variant.name.clone(),
                    variant.price_delta,
                ))
            })
            .collect();

        OptionSelection::new(chosen)
    }

    /// Builds the cart line for the current selection.
    pub fn to_cart_item(&self, quantity: u32) -> CartItem {
        CartItem::new(
            self.product.id.clone(),
            self.product.name.clone(),
            self.product.base_price,
            self.resolve(),
            quantity,
        )
    }

    /// The commands issued by the "Add to Cart" button: add the line, then
    /// open the drawer.
    pub fn add_to_cart_commands(&self, quantity: u32) -> [CartCommand; 2] {
        [
            CartCommand::AddItem(self.to_cart_item(quantity)),
            CartCommand::OpenCart,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartState;
    use crate::catalog;

    fn device() -> ProductDescriptor {
        catalog::descriptor(catalog::PREMIUM_DEVICE_ID).unwrap()
    }

    #[test]
    fn test_defaults() {
        let product = device();
        let configurator = Configurator::new(&product);

        assert_eq!(configurator.selected_variant("color").unwrap().id, "midnight");
        assert_eq!(configurator.selected_variant("storage").unwrap().id, "128gb");
        assert_eq!(configurator.selected_variant("material").unwrap().id, "aluminum");
        assert_eq!(configurator.price(), Money::from_major_minor(999, 0));
    }

    #[test]
    fn test_price_follows_selection() {
        let product = device();
        let mut configurator = Configurator::new(&product);

        configurator.select("storage", "512gb").unwrap();
        configurator.select("material", "ceramic").unwrap();
        assert_eq!(configurator.price(), Money::from_major_minor(999 + 400 + 500, 0));

        configurator.select("storage", "128gb").unwrap();
        assert_eq!(configurator.price(), Money::from_major_minor(999 + 500, 0));
    }

    #[test]
    fn test_rejects_unknown_values() {
        let product = device();
        let mut configurator = Configurator::new(&product);

        let err = configurator.select("storage", "2tb").unwrap_err();
        assert!(matches!(err, CoreError::UnknownVariant { .. }));

        let err = configurator.select("engraving", "yes").unwrap_err();
        assert!(matches!(err, CoreError::UnknownOption { .. }));

        // Failed selections leave the state untouched.
        assert_eq!(configurator.price(), Money::from_major_minor(999, 0));
    }

    #[test]
    fn test_resolve_uses_display_names() {
        let product = device();
        let mut configurator = Configurator::new(&product);
        configurator.select("color", "purple").unwrap();
        configurator.select("storage", "256gb").unwrap();

        let selection = configurator.resolve();
        assert_eq!(
            selection.selected_options(),
            vec![("Color", "Deep Purple"), ("Storage", "256GB"), ("Material", "Aluminum")]
        );
        assert_eq!(selection.options_total(), Money::from_major_minor(200, 0));
    }

    #[test]
    fn test_cart_line_uses_base_price() {
        let product = device();
        let mut configurator = Configurator::new(&product);
        configurator.select("storage", "1tb").unwrap();

        let item = configurator.to_cart_item(1);
        assert_eq!(item.base_price, Money::from_major_minor(999, 0));
        assert_eq!(item.unit_price(), configurator.price());
    }

    #[test]
    fn test_add_to_cart_adds_then_opens() {
        let product = device();
        let configurator = Configurator::new(&product);
        let mut cart = CartState::new();

        for command in configurator.add_to_cart_commands(1) {
            cart.apply(command);
        }
        for command in configurator.add_to_cart_commands(1) {
            cart.apply(command);
        }

        assert!(cart.is_open());
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total(), Money::from_major_minor(1998, 0));
    }

    #[test]
    fn test_plain_product_has_fixed_price() {
        let product = catalog::descriptor("1").unwrap();
        let configurator = Configurator::new(&product);

        assert!(configurator.resolve().is_empty());
        assert_eq!(configurator.price(), Money::from_cents(29_999));
    }
}
