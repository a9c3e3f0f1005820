use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A raw stored feature value, before type-specific encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl FeatureValue {
    /// Numeric reading. Text is parsed; unparsable text has no number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Category reading used by nominal and ordinal encodings. Integral
    /// numbers render without a fractional part so `2.0` matches `"2"`.
    pub fn as_category(&self) -> String {
        match self {
            FeatureValue::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
            FeatureValue::Number(n) => n.to_string(),
            FeatureValue::Text(s) => s.trim().to_string(),
        }
    }
}

/// Parallel (labels, values) arrays handed to the prediction model.
///
/// Missing features keep their label and carry `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    labels: Vec<String>,
    values: Vec<Option<f64>>,
}

impl FeatureVector {
    pub fn new(labels: Vec<String>, values: Vec<Option<f64>>) -> Result<Self, CoreError> {
        if labels.len() != values.len() {
            return Err(CoreError::LengthMismatch {
                labels: labels.len(),
                values: values.len(),
            });
        }
        Ok(Self { labels, values })
    }

    pub fn push(&mut self, label: impl Into<String>, value: Option<f64>) {
        self.labels.push(label.into());
        self.values.push(value);
    }

    pub fn extend(&mut self, other: FeatureVector) {
        self.labels.extend(other.labels);
        self.values.extend(other.values);
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}
