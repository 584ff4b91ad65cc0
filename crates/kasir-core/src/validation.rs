//! # Validation Module
//!
//! Input validation utilities for Kasir POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum)                                        │
//! │  ├── Body must be JSON / form-encoded                                  │
//! │  └── Malformed body → 400                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Lenient integer coercion (1, 1.0, "1")                            │
//! │  └── Business rules (name non-empty, price >= 0)                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database                                                     │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE (products.name)                                            │
//! │  └── Foreign key sale_items.sale_id                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::validation::{lenient_int, validate_price};
//! use serde_json::json;
//!
//! assert_eq!(lenient_int(&json!("15000")), Some(15_000));
//! assert!(validate_price(15_000).is_ok());
//! ```

use serde_json::Value;

use crate::error::ValidationError;
use crate::MAX_PRODUCT_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most [`MAX_PRODUCT_NAME_LEN`] characters
///
/// ## Example
/// ```rust
/// use kasir_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Minyak Goreng").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in minor units.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Lenient Coercion
// =============================================================================

/// Coerces a JSON value into an integer the way a permissive cashier client
/// expects.
///
/// ## Accepted Inputs
/// ```text
/// 2        → Some(2)
/// 2.9      → Some(2)      (truncated toward zero)
/// " 15 "   → Some(15)     (trimmed numeric string)
/// "abc"    → None
/// null     → None
/// true     → None
/// ```
pub fn lenient_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Reads a field that must be present and integer-valued.
///
/// Absent or `null` yields [`ValidationError::Required`]; anything that
/// cannot be coerced yields [`ValidationError::InvalidFormat`].
pub fn required_int(value: Option<&Value>, field: &str) -> ValidationResult<i64> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::required(field)),
        Some(v) => lenient_int(v).ok_or_else(|| ValidationError::not_an_integer(field)),
    }
}

/// Reads a field that may be absent but must be integer-valued when present.
pub fn optional_int(value: Option<&Value>, field: &str) -> ValidationResult<Option<i64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => lenient_int(v)
            .map(Some)
            .ok_or_else(|| ValidationError::not_an_integer(field)),
    }
}

/// Reads an optional string field. `null` counts as absent.
pub fn optional_str<'a>(value: Option<&'a Value>, field: &str) -> ValidationResult<Option<&'a str>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a string".to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Beras 5kg").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(200)).is_ok());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(50_000).is_ok());
        assert!(validate_price(-1).is_err());
    }

    #[test]
    fn test_lenient_int() {
        assert_eq!(lenient_int(&json!(2)), Some(2));
        assert_eq!(lenient_int(&json!(-7)), Some(-7));
        assert_eq!(lenient_int(&json!(2.9)), Some(2));
        assert_eq!(lenient_int(&json!(" 15 ")), Some(15));
        assert_eq!(lenient_int(&json!("abc")), None);
        assert_eq!(lenient_int(&json!("")), None);
        assert_eq!(lenient_int(&json!(null)), None);
        assert_eq!(lenient_int(&json!(true)), None);
        assert_eq!(lenient_int(&json!([1])), None);
    }

    #[test]
    fn test_required_int() {
        let body = json!({"total": "100000", "bad": "x", "nothing": null});

        assert_eq!(required_int(body.get("total"), "total"), Ok(100_000));
        assert_eq!(
            required_int(body.get("missing"), "total"),
            Err(ValidationError::required("total"))
        );
        assert_eq!(
            required_int(body.get("nothing"), "total"),
            Err(ValidationError::required("total"))
        );
        assert_eq!(
            required_int(body.get("bad"), "total"),
            Err(ValidationError::not_an_integer("total"))
        );
    }

    #[test]
    fn test_optional_int() {
        let body = json!({"paid": 150000, "bad": {}, "nothing": null});

        assert_eq!(optional_int(body.get("paid"), "paid"), Ok(Some(150_000)));
        assert_eq!(optional_int(body.get("missing"), "paid"), Ok(None));
        assert_eq!(optional_int(body.get("nothing"), "paid"), Ok(None));
        assert!(optional_int(body.get("bad"), "paid").is_err());
    }

    #[test]
    fn test_optional_str() {
        let body = json!({"name": "Gula", "num": 3});

        assert_eq!(optional_str(body.get("name"), "name"), Ok(Some("Gula")));
        assert_eq!(optional_str(body.get("missing"), "name"), Ok(None));
        assert!(optional_str(body.get("num"), "name").is_err());
    }
}
