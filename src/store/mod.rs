//! Cart Store
//!
//! Keeps the cart across sessions in client-local storage. The store owns the in-memory cart, which
//! is authoritative for the session, and writes the whole cart back to storage after every
//! mutation.
//!
//! Loading never fails: an absent, unreadable or corrupt blob is an empty cart.

use std::{io, path::PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

#[cfg(test)]
use mockall::automock;

use crate::{
    cart::{Cart, CartError},
    dimensions::Quantity,
    items::{CanvasSelection, CartLineItem, LineItemId, LineItemPatch, WallpaperSelection},
    pricing::{PricingEngine, PricingError, decimal_amount},
    totals::{OrderTotals, TotalsError},
};

pub mod codec;
pub mod file;

pub use codec::CodecError;
pub use file::FileStorage;

/// Errors raised by a storage backing.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The stored blob could not be read.
    #[error("failed to read cart from {0}")]
    Read(PathBuf, #[source] io::Error),

    /// The blob could not be written.
    #[error("failed to write cart to {0}")]
    Write(PathBuf, #[source] io::Error),

    /// The stored blob could not be removed.
    #[error("failed to remove cart at {0}")]
    Remove(PathBuf, #[source] io::Error),

    /// The blob is larger than the storage allows (blob size, quota), in bytes.
    #[error("cart of {0} bytes exceeds the storage quota of {1} bytes")]
    QuotaExceeded(usize, usize),
}

/// Errors raised by the cart store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The cart could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The cart could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The mutation was rejected.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// A new item could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The totals could not be calculated.
    #[error(transparent)]
    Totals(#[from] TotalsError),
}

/// Client-local backing holding a single cart blob.
#[cfg_attr(test, automock)]
pub trait CartStorage {
    /// Read the stored blob, if there is one.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing cannot be read.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored blob.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the blob cannot be written.
    fn write(&mut self, blob: &str) -> Result<(), StorageError>;

    /// Remove the stored blob. Removing an absent blob succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the blob cannot be removed.
    fn remove(&mut self) -> Result<(), StorageError>;
}

/// In-memory storage, optionally limited to a number of bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blob: Option<String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage already holding `blob`.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
            quota: None,
        }
    }

    /// Limit the size of the stored blob.
    #[must_use]
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// The stored blob, if there is one.
    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.blob.clone())
    }

    fn write(&mut self, blob: &str) -> Result<(), StorageError> {
        match self.quota {
            Some(quota) if blob.len() > quota => {
                Err(StorageError::QuotaExceeded(blob.len(), quota))
            }
            _ => {
                self.blob = Some(blob.to_string());

                Ok(())
            }
        }
    }

    fn remove(&mut self) -> Result<(), StorageError> {
        self.blob = None;

        Ok(())
    }
}

/// Reads and decodes the stored cart, falling back to an empty cart.
pub fn load_cart<S: CartStorage + ?Sized>(storage: &S, engine: &PricingEngine) -> Cart {
    match storage.read() {
        Ok(Some(blob)) => codec::decode(&blob, engine),
        Ok(None) => Cart::new(),
        Err(err) => {
            warn!(%err, "failed to read stored cart, starting with an empty cart");

            Cart::new()
        }
    }
}

/// The cart of one session, persisted on every change.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    engine: PricingEngine,
    cart: Cart,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the store, loading whatever cart the storage holds.
    pub fn open(storage: S, engine: PricingEngine) -> Self {
        let cart = load_cart(&storage, &engine);

        debug!(items = cart.len(), "opened cart store");

        Self {
            storage,
            engine,
            cart,
        }
    }

    /// Reload the cart from storage, discarding unsaved state.
    pub fn load(&mut self) -> &Cart {
        self.cart = load_cart(&self.storage, &self.engine);

        &self.cart
    }

    /// Replace the cart and persist it.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the cart cannot be persisted.
    pub fn save(&mut self, cart: Cart) -> Result<(), StoreError> {
        self.cart = cart;

        self.persist()
    }

    /// Empty the cart and remove it from storage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the stored cart cannot be removed.
    #[tracing::instrument(name = "cart.store.clear", skip(self), err)]
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.cart.clear();
        self.storage.remove()?;

        info!("cleared cart");

        Ok(())
    }

    /// Price a wallpaper and add it to the cart.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Pricing`]: the wallpaper could not be priced. The cart is unchanged.
    /// - [`StoreError::Storage`]: the cart could not be persisted.
    #[tracing::instrument(
        name = "cart.store.add_wallpaper",
        skip(self, selection),
        fields(texture = %selection.texture_name),
        err
    )]
    pub fn add_wallpaper(
        &mut self,
        selection: WallpaperSelection,
    ) -> Result<LineItemId, StoreError> {
        let item = self.engine.wallpaper(selection)?;

        self.add(item)
    }

    /// Price a canvas and add it to the cart.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Pricing`]: the size is unknown. The cart is unchanged.
    /// - [`StoreError::Storage`]: the cart could not be persisted.
    #[tracing::instrument(
        name = "cart.store.add_canvas",
        skip(self, selection),
        fields(size = %selection.size_label),
        err
    )]
    pub fn add_canvas(&mut self, selection: CanvasSelection) -> Result<LineItemId, StoreError> {
        let item = self.engine.canvas(selection)?;

        self.add(item)
    }

    fn add(&mut self, item: CartLineItem) -> Result<LineItemId, StoreError> {
        let id = item.id().clone();
        let preco_total = item.preco_total();

        self.cart.add(item);
        self.persist()?;

        info!(id = %id, preco_total = %decimal_amount(&preco_total), "added line item");

        Ok(id)
    }

    /// Apply a patch to a line item, repricing it in the same step.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Cart`]: the item is unknown or the patch cannot be priced. The cart is
    ///   unchanged.
    /// - [`StoreError::Storage`]: the cart could not be persisted.
    #[tracing::instrument(name = "cart.store.update", skip(self, patch), fields(id = %id), err)]
    pub fn update(&mut self, id: &LineItemId, patch: &LineItemPatch) -> Result<(), StoreError> {
        let preco_total = self.cart.update(id, patch, &self.engine)?.preco_total();

        self.persist()?;

        info!(preco_total = %decimal_amount(&preco_total), "updated line item");

        Ok(())
    }

    /// Set the quantity of a line item. Zero and negative values clamp to one.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Cart`]: the item is unknown.
    /// - [`StoreError::Storage`]: the cart could not be persisted.
    #[tracing::instrument(name = "cart.store.set_quantity", skip(self), fields(id = %id), err)]
    pub fn set_quantity(
        &mut self,
        id: &LineItemId,
        quantity: i64,
    ) -> Result<Quantity, StoreError> {
        let quantity = self.cart.set_quantity(id, quantity)?;

        self.persist()?;

        info!(%quantity, "set quantity");

        Ok(quantity)
    }

    /// Add one unit to a line item.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Cart`]: the item is unknown.
    /// - [`StoreError::Storage`]: the cart could not be persisted.
    pub fn increment(&mut self, id: &LineItemId) -> Result<Quantity, StoreError> {
        let quantity = self.cart.increment(id)?;

        self.persist()?;

        Ok(quantity)
    }

    /// Remove one unit from a line item. A single unit stays at one.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Cart`]: the item is unknown.
    /// - [`StoreError::Storage`]: the cart could not be persisted.
    pub fn decrement(&mut self, id: &LineItemId) -> Result<Quantity, StoreError> {
        let quantity = self.cart.decrement(id)?;

        self.persist()?;

        Ok(quantity)
    }

    /// Remove a line item. Removing an unknown id leaves the cart as it is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the cart could not be persisted.
    #[tracing::instrument(name = "cart.store.remove", skip(self), fields(id = %id), err)]
    pub fn remove(&mut self, id: &LineItemId) -> Result<Option<CartLineItem>, StoreError> {
        let removed = self.cart.remove(id);

        self.persist()?;

        info!(removed = removed.is_some(), "removed line item");

        Ok(removed)
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The pricing engine items are priced with.
    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    /// The storage backing.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Order totals of the current cart.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Totals`] if the totals cannot be calculated.
    pub fn totals(&self) -> Result<OrderTotals, StoreError> {
        Ok(self.cart.totals(self.engine.config())?)
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let blob = codec::encode(&self.cart)?;

        self.storage.write(&blob)?;

        debug!(items = self.cart.len(), bytes = blob.len(), "persisted cart");

        Ok(())
    }
}
