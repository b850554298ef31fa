//! Fixtures
//!
//! YAML data files for canvas size tables and pricing configurations, laid out as
//! `<base>/sizes/<name>.yml` and `<base>/pricing/<name>.yml`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    catalog::{CatalogError, SizeTable},
    config::PricingConfig,
    pricing::{PricingEngine, PricingError},
};

pub mod pricing;
pub mod sizes;

pub use pricing::{parse_percentage, parse_price};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Invalid area format
    #[error("Invalid area: {0}")]
    InvalidArea(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between prices in the same fixture
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Size table could not be built
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Pricing configuration and size table disagree
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Fixture loader
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Fixture {
    /// Create a loader rooted at `./fixtures`
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a loader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Base path fixture files are read from
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Load a canvas size table from `sizes/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its sizes are invalid.
    pub fn load_sizes(&self, name: &str) -> Result<SizeTable, FixtureError> {
        let contents = self.read("sizes", name)?;

        sizes::parse_sizes(&contents)
    }

    /// Load a pricing configuration from `pricing/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its prices are invalid.
    pub fn load_pricing(&self, name: &str) -> Result<PricingConfig, FixtureError> {
        let contents = self.read("pricing", name)?;

        pricing::parse_pricing(&contents)
    }

    /// Build a pricing engine from the named pricing and size fixtures.
    ///
    /// A missing name falls back to the built-in defaults for that half.
    ///
    /// # Errors
    ///
    /// Returns an error if a fixture cannot be loaded or the two disagree on currency.
    pub fn engine(
        &self,
        pricing: Option<&str>,
        sizes: Option<&str>,
    ) -> Result<PricingEngine, FixtureError> {
        let config = match pricing {
            Some(name) => self.load_pricing(name)?,
            None => PricingConfig::default(),
        };

        let sizes = match sizes {
            Some(name) => self.load_sizes(name)?,
            None => SizeTable::default(),
        };

        Ok(PricingEngine::new(config, sizes)?)
    }

    fn read(&self, kind: &str, name: &str) -> Result<String, FixtureError> {
        let file_path = self.base_path.join(kind).join(format!("{name}.yml"));

        fs::read_to_string(&file_path).map_err(|err| FixtureError::Io(file_path, err))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rusty_money::{Money, iso::EUR};
    use testresult::TestResult;

    use super::*;

    fn repo_fixtures() -> Fixture {
        Fixture::with_base_path(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures"))
    }

    #[test]
    fn loads_default_sizes_from_disk() -> TestResult {
        let sizes = repo_fixtures().load_sizes("default")?;

        assert_eq!(sizes.len(), SizeTable::default().len());
        assert_eq!(
            sizes.get("50x70").map(|size| size.base_price()),
            Some(Money::from_minor(50_00, EUR))
        );

        Ok(())
    }

    #[test]
    fn loads_promo_pricing_from_disk() -> TestResult {
        let config = repo_fixtures().load_pricing("promo")?;

        assert_eq!(config.free_shipping_threshold, Money::from_minor(75_00, EUR));
        assert_eq!(config.flat_shipping_fee, Money::from_minor(10_00, EUR));

        Ok(())
    }

    #[test]
    fn engine_falls_back_to_defaults() -> TestResult {
        let engine = repo_fixtures().engine(None, None)?;

        assert_eq!(engine.sizes().len(), SizeTable::default().len());
        assert_eq!(engine.config().currency, EUR);

        Ok(())
    }

    #[test]
    fn missing_file_reports_path() {
        let result = repo_fixtures().load_sizes("does-not-exist");

        assert!(
            matches!(&result, Err(FixtureError::Io(path, _)) if path.ends_with("sizes/does-not-exist.yml")),
            "expected Io error, got {result:?}"
        );
    }
}
