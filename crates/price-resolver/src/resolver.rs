//! Price Resolver
//!
//! Top-level dispatch: picks the provider strategy, walks the bridging
//! path one hop at a time, and folds hop prices by multiplication.
//! Hops accumulate through an `Option` so "no hops yet" can never be
//! confused with a legitimate near-zero rate; an empty path resolves
//! to the identity price.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::binance::window_average;
use crate::config::ResolverConfig;
use crate::error::Result;
use crate::fetch::FetchClient;
use crate::kraken::TickBracketer;
use crate::model::{Coin, Provider, WindowAverage};
use crate::path::{binance_path, kraken_path};

/// Resolves the fiat price of a coin at a historical instant
pub struct PriceResolver<F: FetchClient> {
    fetch: F,
    config: ResolverConfig,
}

impl<F: FetchClient> PriceResolver<F> {
    /// Create a resolver with the default configuration
    pub fn new(fetch: F) -> Self {
        Self::with_config(fetch, ResolverConfig::default())
    }

    pub fn with_config(fetch: F, config: ResolverConfig) -> Self {
        Self { fetch, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Fiat price of `coin` at `at`, sourced per the originating provider
    pub async fn resolve(&self, provider: Provider, coin: Coin, at: DateTime<Utc>) -> Result<Decimal> {
        debug!(%provider, %coin, %at, "resolving price");
        match provider {
            Provider::Default | Provider::Kraken => self.kraken_price(coin, at).await,
            Provider::Binance => self.binance_price(coin, at).await,
        }
    }

    /// Kraken strategy: one bracketed daily-candle mid per hop
    async fn kraken_price(&self, coin: Coin, at: DateTime<Utc>) -> Result<Decimal> {
        let target = at.timestamp();
        let bracketer = TickBracketer::new(&self.fetch, &self.config);

        let mut folded: Option<Decimal> = None;
        for pair in kraken_path(coin, self.config.fiat)? {
            let hop = bracketer.bracket(&pair, target).await?.mid();
            folded = Some(folded.map_or(hop, |acc| acc * hop));
        }

        // Empty path: the coin already is the quote currency.
        Ok(folded.unwrap_or(Decimal::ONE))
    }

    /// Binance strategy: average the one-minute window per hop down to
    /// the bridge coin, then convert through the Kraken fiat rate
    async fn binance_price(&self, coin: Coin, at: DateTime<Utc>) -> Result<Decimal> {
        let millis = at.timestamp_millis();
        let minute_ms = millis - millis.rem_euclid(60_000);

        let mut folded: Option<WindowAverage> = None;
        for pair in binance_path(coin) {
            let hop = window_average(&self.fetch, &pair, minute_ms).await?;
            folded = Some(folded.map_or(hop, |acc| acc.fold(hop)));
        }
        let bridged = folded.map_or(Decimal::ONE, |avg| avg.close);

        // The bridge rate always comes from the Kraken strategy; it
        // must never loop back through Binance.
        let bridge = self.kraken_price(self.config.bridge_coin, at).await?;
        Ok(bridged * bridge)
    }
}
