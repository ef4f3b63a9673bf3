//! Resolver Configuration

use std::time::Duration;

use crate::model::Coin;

/// Price resolver configuration
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Fiat currency prices are resolved into
    pub fiat: Coin,

    /// Intermediate coin the Binance path bridges through. The bridge
    /// rate itself is always resolved through the Kraken path.
    pub bridge_coin: Coin,

    /// Maximum OHLC pages fetched while searching for a bracket
    pub max_pages: u32,

    /// Consecutive empty responses tolerated before a pair is declared
    /// unavailable
    pub empty_retries: u32,

    /// Base delay between OHLC pages; retries back off exponentially
    /// from this value
    pub page_delay: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fiat: Coin::Usd,
            bridge_coin: Coin::Btc,
            max_pages: 64,
            empty_retries: 3,
            page_delay: Duration::from_millis(250),
        }
    }
}

impl ResolverConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let fiat = std::env::var("PRICE_FIAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.fiat);
        let max_pages = std::env::var("PRICE_MAX_PAGES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_pages);
        let page_delay = std::env::var("PRICE_PAGE_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(defaults.page_delay, Duration::from_millis);

        Self {
            fiat,
            max_pages,
            page_delay,
            ..defaults
        }
    }

    /// Configuration with no inter-page delay, for tests
    #[cfg(test)]
    pub(crate) fn immediate() -> Self {
        Self {
            page_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}
