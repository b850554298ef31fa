//! `realce-cart` command line

use std::io::{self, Write};

use clap::{Args, Parser, Subcommand};
use realce::{
    dimensions::{Dimension, ValidationError},
    fixtures::FixtureError,
    items::{CartLineItem, LineItemId, LineItemKind},
    pricing::{PricingError, money_from_decimal},
    receipt::{Receipt, ReceiptError, format_money},
    store::{CartStore, FileStorage, StoreError},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

use crate::cli::config::{CatalogConfig, LoggingConfig, StorageConfig};

mod add;
mod config;
mod logging;
mod update;

/// Errors reported by the command line.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// The pricing or size fixtures could not be loaded.
    #[error("invalid catalog: {0}")]
    Catalog(#[from] FixtureError),

    /// A cart operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The receipt could not be printed.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// An amount could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// An argument failed validation.
    #[error("invalid --{arg}: {source}")]
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,

        /// What was wrong with it.
        source: ValidationError,
    },

    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    /// The log subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] TryInitError),
}

#[derive(Debug, Parser)]
#[command(name = "realce-cart", about = "DOMREALCE cart", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    storage: StorageConfig,

    #[command(flatten)]
    catalog: CatalogConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the canvas sizes and their prices
    Sizes,

    /// Price a product and add it to the cart
    Add(add::AddCommand),

    /// Change the configuration of a line item
    Update(update::UpdateArgs),

    /// Set the quantity of a line item
    Quantity(QuantityArgs),

    /// Add one unit to a line item
    Increment(ItemArgs),

    /// Remove one unit from a line item
    Decrement(ItemArgs),

    /// Remove a line item
    Remove(ItemArgs),

    /// Empty the cart
    Clear,

    /// List line items with their ids
    List,

    /// Print the order summary
    Show,
}

#[derive(Debug, Args)]
struct ItemArgs {
    /// Line item id
    id: String,
}

#[derive(Debug, Args)]
struct QuantityArgs {
    /// Line item id
    id: String,

    /// New quantity; anything below one becomes one
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

impl Cli {
    /// Install the log subscriber described by the logging options.
    pub(crate) fn init_logging(&self) -> Result<(), CliError> {
        Ok(logging::init_subscriber(&self.logging)?)
    }

    /// Run the selected command, writing its output to stdout.
    pub(crate) fn run(self) -> Result<(), CliError> {
        let engine = self.catalog.engine()?;
        let mut store = CartStore::open(FileStorage::new(self.storage.cart_path), engine);
        let mut out = io::stdout().lock();

        match self.command {
            Commands::Sizes => write_sizes(&mut out, &store),
            Commands::Add(command) => add::run(command, &mut store, &mut out),
            Commands::Update(args) => update::run(args, &mut store, &mut out),
            Commands::Quantity(args) => {
                let quantity = store.set_quantity(&LineItemId::from(args.id), args.quantity)?;

                writeln!(out, "quantity: {quantity}")?;

                Ok(())
            }
            Commands::Increment(args) => {
                let quantity = store.increment(&LineItemId::from(args.id))?;

                writeln!(out, "quantity: {quantity}")?;

                Ok(())
            }
            Commands::Decrement(args) => {
                let quantity = store.decrement(&LineItemId::from(args.id))?;

                writeln!(out, "quantity: {quantity}")?;

                Ok(())
            }
            Commands::Remove(args) => {
                let id = LineItemId::from(args.id);

                match store.remove(&id)? {
                    Some(item) => writeln!(out, "removed {} ({id})", item.name())?,
                    None => writeln!(out, "no line item {id}")?,
                }

                Ok(())
            }
            Commands::Clear => {
                store.clear()?;

                writeln!(out, "cart cleared")?;

                Ok(())
            }
            Commands::List => write_items(&mut out, &store),
            Commands::Show => {
                Receipt::new(store.cart(), store.engine().config())?.write_to(&mut out)?;

                Ok(())
            }
        }
    }
}

fn write_sizes(out: &mut impl Write, store: &CartStore<FileStorage>) -> Result<(), CliError> {
    for size in store.engine().sizes().iter() {
        writeln!(
            out,
            "{:<8} {:>4} × {:<4} cm  {}",
            size.size(),
            size.width_cm(),
            size.height_cm(),
            format_money(&size.base_price())
        )?;
    }

    Ok(())
}

fn write_items(out: &mut impl Write, store: &CartStore<FileStorage>) -> Result<(), CliError> {
    if store.cart().is_empty() {
        writeln!(out, "cart is empty")?;
    }

    for item in store.cart().iter() {
        write_item(out, item)?;
    }

    Ok(())
}

fn write_item(out: &mut impl Write, item: &CartLineItem) -> Result<(), CliError> {
    let summary = match item.kind() {
        LineItemKind::Wallpaper(wallpaper) => {
            format!("{} × {} m", wallpaper.width_m(), wallpaper.height_m())
        }
        LineItemKind::Canvas(canvas) => format!("{} cm", canvas.size().size()),
    };

    writeln!(
        out,
        "{}  {:<9} {} ({summary})  {} × {}",
        item.id(),
        item.kind().type_name(),
        item.name(),
        item.quantity(),
        format_money(&item.preco_total())
    )?;

    Ok(())
}

/// Parses a dimension argument.
///
/// Strict by default. With `lenient`, a missing or invalid value becomes zero and is floored by the
/// minimum area.
fn dimension(
    arg: &'static str,
    input: Option<&str>,
    lenient: bool,
) -> Result<Dimension, CliError> {
    let parsed = match input {
        _ if lenient => Ok(Dimension::coerce(input.unwrap_or_default())),
        Some(value) => Dimension::parse(value),
        None => Err(ValidationError::Empty),
    };

    parsed.map_err(|source| CliError::InvalidArgument { arg, source })
}

/// Parses an amount of money, e.g. `25.00` or `25,00`.
fn amount(
    arg: &'static str,
    input: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, CliError> {
    // Amounts follow the same rules as measurements: non-negative, point or comma separated.
    let value = Dimension::parse(input)
        .map_err(|source| CliError::InvalidArgument { arg, source })?
        .value();

    Ok(money_from_decimal(value, currency)?)
}
