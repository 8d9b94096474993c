//! Lenient readers for provider JSON fields
//!
//! Providers are inconsistent about encoding numbers: the same field may
//! arrive as a JSON number, a decimal string or a hex string.

use alloy_primitives::U256;
use serde_json::Value;

/// Integer amount from a number or string field
pub fn u256_field(value: Option<&Value>) -> Option<U256> {
    match value? {
        Value::String(s) => s.trim().parse::<U256>().ok(),
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Some(U256::from(v))
            } else {
                let f = n.as_f64()?;
                (f.is_finite() && f >= 0.0 && f.fract() == 0.0).then(|| U256::from(f as u128))
            }
        }
        _ => None,
    }
}

/// Non-negative integer from a number or string field
pub fn u64_field(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Number(n) => n.as_u64().or_else(|| {
            let f = n.as_f64()?;
            (f.is_finite() && f >= 0.0).then(|| f.round() as u64)
        }),
        _ => None,
    }
}

/// Float from a number or string field
pub fn f64_field(value: Option<&Value>) -> Option<f64> {
    let f = match value? {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    f.is_finite().then_some(f)
}

/// Array of route steps, empty when absent or not an array
pub fn steps_field(value: Option<&Value>) -> Vec<Value> {
    value
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
