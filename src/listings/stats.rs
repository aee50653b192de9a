//! Price statistics over listings

use super::types::Listing;
use serde::{Deserialize, Serialize};

/// Lowest, highest and mean price of a set of listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

/// Price range of `listings`; all zeros when empty
pub fn price_range(listings: &[Listing]) -> PriceRange {
    if listings.is_empty() {
        return PriceRange::default();
    }

    let (min, max, sum) = listings.iter().map(|l| l.price.amount).fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(min, max, sum), price| (min.min(price), max.max(price), sum + price),
    );

    PriceRange {
        min,
        max,
        average: sum / listings.len() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(price: f64) -> Listing {
        Listing::new("x", "eBay", "x", price, "https://ebay.com/sample")
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(
            price_range(&[]),
            PriceRange {
                min: 0.0,
                max: 0.0,
                average: 0.0
            }
        );
    }

    #[test]
    fn test_two_prices() {
        let range = price_range(&[priced(10.0), priced(20.0)]);
        assert_eq!(range.min, 10.0);
        assert_eq!(range.max, 20.0);
        assert_eq!(range.average, 15.0);
    }

    #[test]
    fn test_single_price() {
        let range = price_range(&[priced(4200.0)]);
        assert_eq!(range.min, 4200.0);
        assert_eq!(range.max, 4200.0);
        assert_eq!(range.average, 4200.0);
    }
}
