//! Catalog
//!
//! The canvas size table: every printable canvas size, its physical dimensions and its fixed price.

use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR},
};
use thiserror::Error;
use tracing::error;

/// Errors raised while building a size table.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// The same size label appears twice.
    #[error("duplicate size label: {0}")]
    DuplicateSize(String),

    /// A size is priced in a different currency from the rest of the table (size, size currency,
    /// table currency).
    #[error("size {0} is priced in {1}, but the table uses {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// A named canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeOption {
    size: String,
    width_cm: u32,
    height_cm: u32,
    base_price: Money<'static, Currency>,
}

impl SizeOption {
    /// Creates a new size option.
    pub fn new(
        size: impl Into<String>,
        width_cm: u32,
        height_cm: u32,
        base_price: Money<'static, Currency>,
    ) -> Self {
        Self {
            size: size.into(),
            width_cm,
            height_cm,
            base_price,
        }
    }

    /// Size label, e.g. `"50x70"`.
    pub fn size(&self) -> &str {
        &self.size
    }

    /// Width in centimetres.
    pub fn width_cm(&self) -> u32 {
        self.width_cm
    }

    /// Height in centimetres.
    pub fn height_cm(&self) -> u32 {
        self.height_cm
    }

    /// Fixed price of a canvas of this size.
    pub fn base_price(&self) -> Money<'static, Currency> {
        self.base_price
    }
}

/// Ordered table of canvas sizes with lookup by label.
#[derive(Debug, Clone)]
pub struct SizeTable {
    options: Vec<SizeOption>,
    index: FxHashMap<String, usize>,
}

impl SizeTable {
    /// Builds a table, keeping the given order.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateSize`]: two options share a label.
    /// - [`CatalogError::CurrencyMismatch`]: options are priced in different currencies.
    pub fn new(options: impl Into<Vec<SizeOption>>) -> Result<Self, CatalogError> {
        let options = options.into();
        let index = index_labels(&options)?;

        Ok(Self { options, index })
    }

    /// Looks up a size by its label.
    pub fn get(&self, label: &str) -> Option<&SizeOption> {
        self.index
            .get(label)
            .and_then(|&idx| self.options.get(idx))
    }

    /// Iterate over the sizes in table order.
    pub fn iter(&self) -> impl Iterator<Item = &SizeOption> {
        self.options.iter()
    }

    /// Number of sizes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the table has no sizes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Currency the table is priced in, if it has any sizes.
    pub fn currency(&self) -> Option<&'static Currency> {
        self.options
            .first()
            .map(|option| option.base_price.currency())
    }
}

impl Default for SizeTable {
    /// The storefront's canvas sizes, priced in euros.
    fn default() -> Self {
        let options: Vec<SizeOption> = [
            ("30x40", 30, 40, 25_00),
            ("40x60", 40, 60, 35_00),
            ("50x70", 50, 70, 50_00),
            ("60x90", 60, 90, 70_00),
            ("70x100", 70, 100, 95_00),
            ("100x150", 100, 150, 150_00),
        ]
        .into_iter()
        .map(|(size, width, height, price)| {
            SizeOption::new(size, width, height, Money::from_minor(price, EUR))
        })
        .collect();

        match index_labels(&options) {
            Ok(index) => Self { options, index },
            Err(err) => {
                error!(%err, "built-in size table is invalid");

                Self {
                    options: Vec::new(),
                    index: FxHashMap::default(),
                }
            }
        }
    }
}

/// Maps each label to its position, checking labels are unique and prices share one currency.
fn index_labels(options: &[SizeOption]) -> Result<FxHashMap<String, usize>, CatalogError> {
    let mut index = FxHashMap::default();
    let mut currency: Option<&'static Currency> = None;

    for (idx, option) in options.iter().enumerate() {
        let option_currency = option.base_price.currency();

        match currency {
            Some(table_currency) if table_currency != option_currency => {
                return Err(CatalogError::CurrencyMismatch(
                    option.size.clone(),
                    option_currency.iso_alpha_code,
                    table_currency.iso_alpha_code,
                ));
            }
            Some(_) => {}
            None => currency = Some(option_currency),
        }

        if index.insert(option.size.clone(), idx).is_some() {
            return Err(CatalogError::DuplicateSize(option.size.clone()));
        }
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn default_table_prices_known_sizes() {
        let table = SizeTable::default();

        let price = |label: &str| table.get(label).map(SizeOption::base_price);

        assert_eq!(price("30x40"), Some(Money::from_minor(25_00, EUR)));
        assert_eq!(price("50x70"), Some(Money::from_minor(50_00, EUR)));
        assert_eq!(price("100x150"), Some(Money::from_minor(150_00, EUR)));
        assert_eq!(table.currency(), Some(EUR));
    }

    #[test]
    fn default_table_keeps_dimensions() -> TestResult {
        let table = SizeTable::default();
        let option = table.get("70x100").ok_or("missing 70x100")?;

        assert_eq!(option.width_cm(), 70);
        assert_eq!(option.height_cm(), 100);

        Ok(())
    }

    #[test]
    fn default_table_passes_validation() -> TestResult {
        let default = SizeTable::default();
        let options: Vec<SizeOption> = default.iter().cloned().collect();

        assert_eq!(index_labels(&options)?.len(), 6);
        assert_eq!(SizeTable::new(options)?.len(), default.len());

        Ok(())
    }

    #[test]
    fn unknown_label_is_none() {
        assert!(SizeTable::default().get("1x1").is_none());
    }

    #[test]
    fn new_keeps_order() -> TestResult {
        let table = SizeTable::new([
            SizeOption::new("b", 2, 2, Money::from_minor(200, EUR)),
            SizeOption::new("a", 1, 1, Money::from_minor(100, EUR)),
        ])?;

        let labels: Vec<&str> = table.iter().map(SizeOption::size).collect();

        assert_eq!(labels, vec!["b", "a"]);
        assert_eq!(table.len(), 2);

        Ok(())
    }

    #[test]
    fn new_rejects_duplicate_labels() {
        let result = SizeTable::new([
            SizeOption::new("a", 1, 1, Money::from_minor(100, EUR)),
            SizeOption::new("a", 2, 2, Money::from_minor(200, EUR)),
        ]);

        assert!(matches!(result, Err(CatalogError::DuplicateSize(label)) if label == "a"));
    }

    #[test]
    fn new_rejects_mixed_currencies() {
        let result = SizeTable::new([
            SizeOption::new("a", 1, 1, Money::from_minor(100, EUR)),
            SizeOption::new("b", 2, 2, Money::from_minor(200, GBP)),
        ]);

        assert!(matches!(
            result,
            Err(CatalogError::CurrencyMismatch(label, "GBP", "EUR")) if label == "b"
        ));
    }
}
