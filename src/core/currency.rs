//! Currency rate abstractions and core types

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Failures that can occur while fetching rates or converting an amount.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Malformed rate for currency: {0}")]
    MalformedRate(String),

    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),
}

/// Exchange rates for every currency the provider knows, relative to one base.
///
/// Values are kept exactly as the provider sent them; a non-numeric value
/// only becomes an error when it is looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    rates: Map<String, Value>,
}

impl RateTable {
    pub fn new(base: impl Into<String>, rates: Map<String, Value>) -> Self {
        Self {
            base: base.into(),
            rates,
        }
    }

    /// Validates a decoded response body and extracts its `data` mapping.
    pub fn from_response(base: &str, body: Value) -> Result<Self, ConversionError> {
        let data = match body {
            Value::Object(mut fields) => fields.remove("data"),
            _ => None,
        };
        match data {
            Some(Value::Object(rates)) => Ok(Self::new(base, rates)),
            Some(other) => Err(ConversionError::MalformedResponse(format!(
                "expected 'data' to be an object, got {}",
                json_type_name(&other)
            ))),
            None => Err(ConversionError::MalformedResponse(
                "missing 'data' field".to_string(),
            )),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Currency codes in the table, sorted.
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.rates.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Looks up the rate for `code`.
    pub fn rate(&self, code: &str) -> Result<f64, ConversionError> {
        let value = self
            .rates
            .get(code)
            .ok_or_else(|| ConversionError::UnknownCurrency(code.to_string()))?;
        value
            .as_f64()
            .ok_or_else(|| ConversionError::MalformedRate(code.to_string()))
    }

    /// Iterates `(code, rate)` pairs in code order; non-numeric rates yield `None`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        let mut entries: Vec<_> = self.rates.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(k, v)| (k.as_str(), v.as_f64()))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the full rate table for `base_currency`.
    async fn fetch_rates(&self, base_currency: &str) -> Result<RateTable, ConversionError>;

    /// Currency codes quoted against `base_currency`.
    async fn available_currencies(
        &self,
        base_currency: &str,
    ) -> Result<Vec<String>, ConversionError> {
        Ok(self.fetch_rates(base_currency).await?.codes())
    }
}
