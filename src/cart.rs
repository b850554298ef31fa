//! Cart

use thiserror::Error;

use crate::{
    config::PricingConfig,
    dimensions::Quantity,
    items::{CartLineItem, LineItemId, LineItemPatch},
    pricing::{PricingEngine, PricingError},
    totals::{OrderTotals, TotalsError},
};

/// Errors related to cart mutations.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// No line item has the given id.
    #[error("Item {0} not found")]
    ItemNotFound(LineItemId),

    /// The updated item could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Ordered list of line items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart holding the given items, in order.
    pub fn with_items(items: impl Into<Vec<CartLineItem>>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Append a line item.
    pub fn add(&mut self, item: CartLineItem) {
        self.items.push(item);
    }

    /// Get a line item by id.
    pub fn get(&self, id: &LineItemId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Apply a patch to a line item, replacing it in place with the repriced item.
    ///
    /// On error the cart is left unchanged.
    ///
    /// # Errors
    ///
    /// - [`CartError::ItemNotFound`]: no item has the given id.
    /// - [`CartError::Pricing`]: the patched item could not be priced.
    pub fn update(
        &mut self,
        id: &LineItemId,
        patch: &LineItemPatch,
        engine: &PricingEngine,
    ) -> Result<&CartLineItem, CartError> {
        let slot = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| CartError::ItemNotFound(id.clone()))?;

        *slot = engine.apply(slot, patch)?;

        Ok(slot)
    }

    /// Set the quantity of a line item. Zero and negative values clamp to one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no item has the given id.
    pub fn set_quantity(
        &mut self,
        id: &LineItemId,
        quantity: i64,
    ) -> Result<Quantity, CartError> {
        self.change_quantity(id, |_| Quantity::new(quantity))
    }

    /// Add one unit to a line item.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no item has the given id.
    pub fn increment(&mut self, id: &LineItemId) -> Result<Quantity, CartError> {
        self.change_quantity(id, Quantity::increment)
    }

    /// Remove one unit from a line item. A single unit stays at one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no item has the given id.
    pub fn decrement(&mut self, id: &LineItemId) -> Result<Quantity, CartError> {
        self.change_quantity(id, Quantity::decrement)
    }

    fn change_quantity(
        &mut self,
        id: &LineItemId,
        change: impl FnOnce(Quantity) -> Quantity,
    ) -> Result<Quantity, CartError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| CartError::ItemNotFound(id.clone()))?;

        let quantity = change(item.quantity());
        item.set_quantity(quantity);

        Ok(quantity)
    }

    /// Remove a line item. Removing an unknown id does nothing.
    pub fn remove(&mut self, id: &LineItemId) -> Option<CartLineItem> {
        let idx = self.items.iter().position(|item| item.id() == id)?;

        Some(self.items.remove(idx))
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate over the line items in order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter()
    }

    /// Line items in order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Calculate the order totals for the current contents.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalsError`] if the totals cannot be calculated.
    pub fn totals(&self, config: &PricingConfig) -> Result<OrderTotals, TotalsError> {
        OrderTotals::calculate(&self.items, config)
    }
}
