//! Realce
//!
//! Pricing and cart core of the DOMREALCE storefront: wallpaper priced by area, canvas prints
//! priced by size, order totals with shipping and IVA, and a cart persisted in client-local
//! storage.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod dimensions;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod store;
pub mod totals;
