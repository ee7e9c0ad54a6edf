//! Market price feeds
//!
//! Two independent read-only JSON endpoints:
//!
//! ```text
//! GET {ticker_url}?symbol=IOUSDT   -> {"symbol": "IOUSDT", "price": "2.51300000"}
//! GET {rates_url}                  -> {"base": "USD", "rates": {"CNY": 7.12, ...}}
//! ```

use std::collections::HashMap;

use reqwest::Client;
use rewardscope_config::PriceConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PriceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid price value: {value}")]
    InvalidPrice { value: String },

    #[error("Rate for {currency} not present in response")]
    MissingRate { currency: String },
}

/// Live figures bundled into the snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketQuotes {
    /// Reward token price in the quote currency
    pub token_price: f64,
    /// Quote-to-local currency conversion rate
    pub conversion_rate: f64,
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    #[serde(deserialize_with = "string_or_number")]
    price: f64,
}

#[derive(Debug, Deserialize)]
struct ExchangeRates {
    rates: HashMap<String, f64>,
}

/// Accepts `"2.5"` as well as `2.5`
fn string_or_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("Invalid price value: {}", text))),
    }
}

/// Parse a ticker response body
pub fn parse_ticker_price(body: &str) -> Result<f64, PriceError> {
    let ticker: TickerPrice = serde_json::from_str(body)?;
    if !ticker.price.is_finite() {
        return Err(PriceError::InvalidPrice {
            value: ticker.price.to_string(),
        });
    }
    Ok(ticker.price)
}

/// Parse an exchange-rate response body and pick `currency`
pub fn parse_exchange_rate(body: &str, currency: &str) -> Result<f64, PriceError> {
    let rates: ExchangeRates = serde_json::from_str(body)?;
    rates
        .rates
        .get(currency)
        .copied()
        .ok_or_else(|| PriceError::MissingRate {
            currency: currency.to_string(),
        })
}

pub struct PriceFeed {
    client: Client,
    config: PriceConfig,
}

impl PriceFeed {
    pub fn from_config(config: &PriceConfig) -> Self {
        Self {
            client: crate::http_client(config.request_timeout_secs),
            config: config.clone(),
        }
    }

    async fn get_text(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<String, PriceError> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(PriceError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    pub async fn fetch_token_price(&self) -> Result<f64, PriceError> {
        let request = self
            .client
            .get(&self.config.ticker_url)
            .query(&[("symbol", self.config.ticker_symbol.as_str())]);
        let body = self.get_text(request, &self.config.ticker_url).await?;
        parse_ticker_price(&body)
    }

    pub async fn fetch_conversion_rate(&self) -> Result<f64, PriceError> {
        let request = self.client.get(&self.config.rates_url);
        let body = self.get_text(request, &self.config.rates_url).await?;
        parse_exchange_rate(&body, &self.config.rate_currency)
    }

    /// Both figures, fetched one after the other
    pub async fn fetch_quotes(&self) -> Result<MarketQuotes, PriceError> {
        let token_price = self.fetch_token_price().await?;
        let conversion_rate = self.fetch_conversion_rate().await?;

        info!(
            event_type = "quotes_fetched",
            symbol = %self.config.ticker_symbol,
            token_price,
            currency = %self.config.rate_currency,
            conversion_rate,
            "Fetched market quotes"
        );

        Ok(MarketQuotes {
            token_price,
            conversion_rate,
        })
    }
}
