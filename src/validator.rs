//! Numeric validation of raw price/size pairs
//!
//! Pure checks with no side effects; callers decide what to do with a
//! rejected pair (the ingestion path logs it and drops it).

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Reason a raw level was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidLevel {
    #[error("Invalid data types: price={price}, size={size}")]
    NotNumeric { price: String, size: String },

    #[error("Invalid values: price={price}, size={size}")]
    OutOfRange { price: Decimal, size: Decimal },

    #[error("Price too high: {0}")]
    AboveCeiling(Decimal),
}

/// Validate one raw price/size pair, returning the parsed values
///
/// Rejects unparseable fields, non-positive prices, negative sizes, and
/// prices above the sanity ceiling. A size of zero is accepted here; zero
/// means removal and is filtered by the leveler.
pub fn validate(price: &str, size: &str, ceiling: Decimal) -> Result<(Decimal, Decimal), InvalidLevel> {
    let (price_dec, size_dec) = match (Decimal::from_str(price), Decimal::from_str(size)) {
        (Ok(p), Ok(s)) => (p, s),
        _ => {
            return Err(InvalidLevel::NotNumeric {
                price: price.to_string(),
                size: size.to_string(),
            })
        }
    };

    if price_dec <= Decimal::ZERO || size_dec < Decimal::ZERO {
        return Err(InvalidLevel::OutOfRange {
            price: price_dec,
            size: size_dec,
        });
    }

    if price_dec > ceiling {
        return Err(InvalidLevel::AboveCeiling(price_dec));
    }

    Ok((price_dec, size_dec))
}
