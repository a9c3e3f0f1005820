use serde::{Deserialize, Serialize};

use crate::cache_keys::SESSION_KEY_SEPARATOR;
use crate::error::CoreError;
use crate::models::features::FeatureValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

/// A person enrolled for study.
///
/// `lbd_probability` is a denormalized copy of the last subject-level
/// prediction. It is never authoritative; the prediction cache is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub code: String,
    pub age: u16,
    pub sex: Sex,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub diagnosed: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub lbd_probability: Option<f64>,
    #[serde(default)]
    pub last_examined_on: Option<jiff::Timestamp>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Subject {
    pub fn new(code: impl Into<String>, age: u16, sex: Sex) -> Result<Self, CoreError> {
        let code = code.into();
        validate_code(&code)?;
        let now = jiff::Timestamp::now();
        Ok(Self {
            code,
            age,
            sex,
            nationality: None,
            organization: None,
            diagnosed: false,
            description: None,
            lbd_probability: None,
            last_examined_on: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Demographic value usable as a prediction feature.
    pub fn feature_value(&self, name: &str) -> Option<FeatureValue> {
        match name {
            "age" => Some(FeatureValue::Number(f64::from(self.age))),
            "sex" => Some(FeatureValue::Text(self.sex.as_str().to_string())),
            "nationality" => self.nationality.clone().map(FeatureValue::Text),
            _ => None,
        }
    }
}

/// Subject codes double as storage and cache key segments.
///
/// A code containing the session key separator could make a subject key
/// equal to another subject's session key, so it is rejected.
pub fn validate_code(code: &str) -> Result<(), CoreError> {
    let valid = !code.is_empty()
        && code.len() <= 50
        && !code.contains(SESSION_KEY_SEPARATOR)
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidSubjectCode(code.to_string()))
    }
}
