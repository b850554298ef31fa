//! Receipt

use std::{fmt::Write, io};

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    config::PricingConfig,
    items::{CartLineItem, LineItemKind},
    pricing::{PricingError, decimal_amount},
    totals::{OrderTotals, TotalsError},
};

/// Errors that can occur when building or printing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The order totals could not be calculated.
    #[error(transparent)]
    Totals(#[from] TotalsError),

    /// A line price could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("failed to write receipt")]
    Io(#[from] io::Error),
}

/// Order summary of a cart, as shown on the cart page.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    cart: &'a Cart,
    totals: OrderTotals,
    config: PricingConfig,
}

impl<'a> Receipt<'a> {
    /// Create a receipt for the cart, calculating its totals.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Totals`] if the totals cannot be calculated.
    pub fn new(cart: &'a Cart, config: &PricingConfig) -> Result<Self, ReceiptError> {
        Ok(Self {
            cart,
            totals: cart.totals(config)?,
            config: *config,
        })
    }

    /// Order totals shown in the summary.
    pub fn totals(&self) -> &OrderTotals {
        &self.totals
    }

    /// Prints the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if a line price cannot be calculated or the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.cart.is_empty() {
            writeln!(out, "\n Cart is empty.")?;
        } else {
            let mut builder = Builder::default();

            builder.push_record(["", "Item", "Details", "Unit Price", "Qty", "Line Total"]);

            for (position, item) in self.cart.iter().enumerate() {
                builder.push_record(item_row(position + 1, item, &self.config)?);
            }

            write_receipt_table(&mut out, builder, self.cart.len())?;
        }

        write_receipt_summary(&mut out, &self.totals, &self.config)
    }
}

fn item_row(
    position: usize,
    item: &CartLineItem,
    config: &PricingConfig,
) -> Result<[String; 6], ReceiptError> {
    Ok([
        format!("#{position}"),
        item.name().to_string(),
        item_details(item, config)?,
        format_money(&item.preco_total()),
        item.quantity().to_string(),
        format_money(&item.line_total()?),
    ])
}

fn item_details(item: &CartLineItem, config: &PricingConfig) -> Result<String, ReceiptError> {
    let details = match item.kind() {
        LineItemKind::Wallpaper(wallpaper) => {
            let lamination = if wallpaper.lamination() {
                ", laminated"
            } else {
                ""
            };

            format!(
                "{} × {} m ({:.2} m²)\n{}{lamination}\n{}",
                wallpaper.width_m(),
                wallpaper.height_m(),
                wallpaper.area(),
                wallpaper.finish().as_str(),
                wallpaper.adhesive_type().as_str(),
            )
        }
        LineItemKind::Canvas(canvas) => {
            let mut details = format!("{} cm", canvas.size().size());

            if let Some(with_vat) = item.canvas_price_with_vat(&config.vat_rate)? {
                _ = write!(details, "\n{} incl. IVA", format_money(&with_vat));
            }

            details
        }
    };

    Ok(details)
}

fn write_receipt_table(
    out: &mut impl io::Write,
    builder: Builder,
    item_count: usize,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();

    // Under the header and between items.
    for row in 1..=item_count {
        theme.insert_horizontal_line(row, separator);
    }

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    for row in 1..=item_count {
        table.modify((row, 2), Color::FG_BRIGHT_BLACK);
    }

    writeln!(out, "\n{table}")?;

    Ok(())
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    totals: &OrderTotals,
    config: &PricingConfig,
) -> Result<(), ReceiptError> {
    let shipping = if totals.checkout_enabled() && totals.free_shipping() {
        "free".to_string()
    } else {
        format_money(&totals.shipping())
    };

    let lines = [
        ("Subtotal:".to_string(), format_money(&totals.subtotal())),
        ("Shipping:".to_string(), shipping),
        (
            format!("IVA ({}%):", config.vat_points()),
            format_money(&totals.vat()),
        ),
        ("Total:".to_string(), format_money(&totals.total())),
    ];

    let label_width = lines
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or_default();
    let value_width = lines
        .iter()
        .map(|(_, value)| value.chars().count())
        .max()
        .unwrap_or_default();

    writeln!(out)?;

    for (label, value) in &lines {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
    }

    if !totals.checkout_enabled() {
        writeln!(out, "\n Checkout disabled: add an item to continue.")?;
    } else if !totals.free_shipping() {
        let remaining = config
            .free_shipping_threshold
            .to_minor_units()
            .saturating_sub(totals.subtotal().to_minor_units());

        writeln!(
            out,
            "\n Add {} more for free shipping.",
            format_money(&Money::from_minor(remaining, config.currency))
        )?;
    }

    writeln!(out)?;

    Ok(())
}

/// Formats an amount with two decimals and its currency code, e.g. `25.00 EUR`.
pub fn format_money(money: &Money<'_, Currency>) -> String {
    format!(
        "{:.2} {}",
        decimal_amount(money),
        money.currency().iso_alpha_code
    )
}
