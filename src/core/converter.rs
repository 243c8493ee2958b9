//! Amount conversion on top of a [`RateProvider`].
//!
//! Every conversion fetches a fresh rate table. Converting A to B and back
//! again uses two independently fetched tables, and providers do not promise
//! reciprocal rates, so a round trip is not expected to return the original
//! amount exactly.

use super::currency::{ConversionError, RateProvider};
use tracing::debug;

/// A user's conversion request after input validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

impl ConversionRequest {
    /// Parses raw user input. Currency codes are trimmed and upper-cased but
    /// not checked against any list of known currencies.
    pub fn parse(amount: &str, from: &str, to: &str) -> Result<Self, ConversionError> {
        Ok(Self {
            amount: parse_amount(amount)?,
            from: normalize_code(from),
            to: normalize_code(to),
        })
    }
}

/// Parses an amount, rejecting anything that is not a finite number.
pub fn parse_amount(input: &str) -> Result<f64, ConversionError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(ConversionError::InvalidAmount(trimmed.to_string())),
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub struct Converter<P: RateProvider> {
    provider: P,
}

impl<P: RateProvider> Converter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Converts `amount` of `base_currency` into `target_currency`.
    ///
    /// The result is `amount * rate` with no rounding applied.
    pub async fn convert(
        &self,
        amount: f64,
        base_currency: &str,
        target_currency: &str,
    ) -> Result<f64, ConversionError> {
        let table = self.provider.fetch_rates(base_currency).await?;
        let rate = table.rate(target_currency)?;
        debug!(
            base = base_currency,
            target = target_currency,
            rate,
            "Resolved exchange rate"
        );
        Ok(amount * rate)
    }

    pub async fn convert_request(
        &self,
        request: &ConversionRequest,
    ) -> Result<f64, ConversionError> {
        self.convert(request.amount, &request.from, &request.to).await
    }
}
