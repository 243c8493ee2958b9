use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, instrument};

use crate::core::{ConversionError, RateProvider, RateTable};

const LATEST_RATES_PATH: &str = "/v2/latest";

/// Rate provider backed by the currencyapi.com `latest` endpoint.
pub struct CurrencyApiProvider {
    endpoint: Url,
    api_key: String,
}

impl CurrencyApiProvider {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let raw = format!("{}{}", base_url.trim_end_matches('/'), LATEST_RATES_PATH);
        let endpoint =
            Url::parse(&raw).with_context(|| format!("Invalid provider base URL: {base_url}"))?;
        Ok(CurrencyApiProvider {
            endpoint,
            api_key: api_key.into(),
        })
    }

    fn request_url(&self, base_currency: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .append_pair("base_currency", base_currency);
        url
    }
}

#[async_trait]
impl RateProvider for CurrencyApiProvider {
    #[instrument(name = "CurrencyApiFetch", skip(self), fields(base = %base_currency))]
    async fn fetch_rates(&self, base_currency: &str) -> Result<RateTable, ConversionError> {
        let url = self.request_url(base_currency);
        debug!("Requesting rates from {}", self.endpoint);

        let client = reqwest::Client::builder()
            .user_agent(concat!("coinconv/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let response = client.get(url).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            debug!(%status, "Rate request rejected");
            return Err(ConversionError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let body: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            ConversionError::MalformedResponse(format!("invalid JSON body: {e}"))
        })?;
        let table = RateTable::from_response(base_currency, body)?;
        debug!(currencies = table.len(), "Received rate table");
        Ok(table)
    }
}
