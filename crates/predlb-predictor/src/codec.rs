//! Wire form of feature values.
//!
//! Values travel as a JSON array encoded into a string. Finite numbers are
//! JSON numbers, a missing value is `null`, and the non-finite values are
//! the strings `"NaN"`, `"Infinity"` and `"-Infinity"`. Decoding is the
//! exact inverse of encoding.

use serde_json::Value;

use crate::error::PredictorError;

const NAN: &str = "NaN";
const INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";

pub fn encode_values(values: &[Option<f64>]) -> Result<String, PredictorError> {
    let wire: Vec<Value> = values.iter().map(|v| to_wire(*v)).collect();
    Ok(serde_json::to_string(&wire)?)
}

pub fn decode_values(encoded: &str) -> Result<Vec<Option<f64>>, PredictorError> {
    let wire: Vec<Value> = serde_json::from_str(encoded)?;
    wire.iter().map(from_wire).collect()
}

fn to_wire(value: Option<f64>) -> Value {
    match value {
        None => Value::Null,
        Some(v) if v.is_nan() => Value::String(NAN.to_string()),
        Some(v) if v == f64::INFINITY => Value::String(INFINITY.to_string()),
        Some(v) if v == f64::NEG_INFINITY => Value::String(NEG_INFINITY.to_string()),
        Some(v) => serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number),
    }
}

fn from_wire(value: &Value) -> Result<Option<f64>, PredictorError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| PredictorError::Codec(format!("unrepresentable number {n}"))),
        Value::String(s) if s == NAN => Ok(Some(f64::NAN)),
        Value::String(s) if s == INFINITY => Ok(Some(f64::INFINITY)),
        Value::String(s) if s == NEG_INFINITY => Ok(Some(f64::NEG_INFINITY)),
        other => Err(PredictorError::Codec(format!("unexpected value {other}"))),
    }
}
