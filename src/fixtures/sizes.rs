//! Size Fixtures

use serde::Deserialize;

use crate::{
    catalog::{SizeOption, SizeTable},
    fixtures::{FixtureError, pricing::parse_money},
};

/// Wrapper for sizes in YAML
#[derive(Debug, Deserialize)]
pub struct SizesFixture {
    /// Sizes in display order
    pub sizes: Vec<SizeFixture>,
}

/// Size Fixture
#[derive(Debug, Deserialize)]
pub struct SizeFixture {
    /// Size label, e.g. "50x70"
    pub size: String,

    /// Width in centimetres
    pub width_cm: u32,

    /// Height in centimetres
    pub height_cm: u32,

    /// Price (e.g., "50.00 EUR")
    pub price: String,
}

impl TryFrom<SizeFixture> for SizeOption {
    type Error = FixtureError;

    fn try_from(fixture: SizeFixture) -> Result<Self, Self::Error> {
        let price = parse_money(&fixture.price)?;

        Ok(SizeOption::new(
            fixture.size,
            fixture.width_cm,
            fixture.height_cm,
            price,
        ))
    }
}

/// Parse a YAML size table.
///
/// # Errors
///
/// Returns an error if the YAML is malformed, a price is invalid, or the sizes do not form a valid
/// table.
pub fn parse_sizes(yaml: &str) -> Result<SizeTable, FixtureError> {
    let fixture: SizesFixture = serde_norway::from_str(yaml)?;

    let options = fixture
        .sizes
        .into_iter()
        .map(SizeOption::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SizeTable::new(options)?)
}
