//! Lenient numeric coercion at the document read boundary.
//!
//! The hosted store does not enforce a schema, so a price may come back
//! as a JSON number, a numeric string, null, or be missing entirely.
//! Price and stock always coerce to numeric types on read and default to
//! zero when absent or malformed. Catalog filtering and checkout
//! validation then treat zero as "not sellable".

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a `Decimal` from a number, numeric string, or anything
/// else (which coerces to zero).
///
/// Use with `#[serde(default, deserialize_with = "coerce::decimal")]`.
///
/// # Errors
///
/// Never fails on malformed values; only on transport-level errors from
/// the underlying deserializer.
pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map_or(Decimal::ZERO, |v| decimal_from_value(&v)))
}

/// Deserialize a `u32` stock count from a number, numeric string, or
/// anything else (which coerces to zero). Negative values floor at zero.
///
/// # Errors
///
/// Never fails on malformed values; only on transport-level errors from
/// the underlying deserializer.
pub fn stock<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map_or(0, |v| stock_from_value(&v)))
}

fn decimal_from_value(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => n
            .to_string()
            .parse::<Decimal>()
            .unwrap_or(Decimal::ZERO),
        Value::String(s) => s.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

// Fractional counts floor; values beyond u32 range clamp.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn stock_from_value(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_u64() {
                u32::try_from(i).unwrap_or(u32::MAX)
            } else {
                // Negative or fractional counts floor at zero
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map_or(0, |f| f.floor() as u32)
            }
        }
        Value::String(s) => s.trim().parse::<u32>().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Priced {
        #[serde(default, deserialize_with = "decimal")]
        price: Decimal,
        #[serde(default, deserialize_with = "stock")]
        stock: u32,
    }

    fn parse(json: &str) -> Priced {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_number_inputs() {
        let p = parse(r#"{"price": 49.5, "stock": 12}"#);
        assert_eq!(p.price, Decimal::new(495, 1));
        assert_eq!(p.stock, 12);
    }

    #[test]
    fn test_string_inputs() {
        let p = parse(r#"{"price": "49.50", "stock": "7"}"#);
        assert_eq!(p.price, Decimal::new(4950, 2));
        assert_eq!(p.stock, 7);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let p = parse("{}");
        assert_eq!(p.price, Decimal::ZERO);
        assert_eq!(p.stock, 0);
    }

    #[test]
    fn test_null_and_garbage_coerce_to_zero() {
        let p = parse(r#"{"price": null, "stock": null}"#);
        assert_eq!(p.price, Decimal::ZERO);
        assert_eq!(p.stock, 0);

        let p = parse(r#"{"price": "free", "stock": {"a": 1}}"#);
        assert_eq!(p.price, Decimal::ZERO);
        assert_eq!(p.stock, 0);
    }

    #[test]
    fn test_negative_stock_floors_at_zero() {
        let p = parse(r#"{"stock": -3}"#);
        assert_eq!(p.stock, 0);
    }

    #[test]
    fn test_fractional_stock_floors() {
        let p = parse(r#"{"stock": 2.9}"#);
        assert_eq!(p.stock, 2);
    }
}
