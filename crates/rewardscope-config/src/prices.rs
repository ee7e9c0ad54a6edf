//! Market price endpoint configuration

use serde::{Deserialize, Serialize};

/// Price feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceConfig {
    /// Ticker price endpoint (`?symbol=` is appended)
    pub ticker_url: String,

    /// Ticker symbol of the reward token against the quote currency
    pub ticker_symbol: String,

    /// Exchange-rate endpoint for the quote currency
    pub rates_url: String,

    /// Currency code looked up in the `rates` object
    pub rate_currency: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            ticker_url: "https://api.binance.com/api/v3/ticker/price".to_string(),
            ticker_symbol: "IOUSDT".to_string(),
            rates_url: "https://api.exchangerate-api.com/v4/latest/USD".to_string(),
            rate_currency: "CNY".to_string(),
            request_timeout_secs: 30,
        }
    }
}
