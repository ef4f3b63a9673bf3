//! # price-resolver
//!
//! Historical fiat pricing for cryptocurrency trades. Given a coin, a
//! timestamp and the exchange whose trade log is being priced, this
//! crate queries public OHLC endpoints and folds cross-rate hops into
//! a single decimal fiat price. It is the pricing core of a FIFO
//! tax-lot accounting tool; parsing, lot matching and reporting live
//! elsewhere.
//!
//! ## Architecture
//!
//! ```text
//! (provider, coin, date)
//!         │
//!         ▼
//!   PriceResolver ──► Path Resolver (coin → pair symbols)
//!         │
//!         ├─ Kraken/Default ──► TickBracketer (paged daily OHLC)
//!         │
//!         └─ Binance ──► window_average (1m klines)
//!                              │
//!                              └─► Kraken BTC/fiat bridge rate
//! ```
//!
//! The `FetchClient` trait isolates all network I/O, so every strategy
//! is testable against canned JSON.
//!
//! ## Example
//!
//! ```no_run
//! use chrono::Utc;
//! use price_resolver::{Coin, HttpFetchClient, PriceResolver, Provider};
//!
//! #[tokio::main]
//! async fn main() -> price_resolver::Result<()> {
//!     let resolver = PriceResolver::new(HttpFetchClient::new()?);
//!     let price = resolver.resolve(Provider::Kraken, Coin::Btc, Utc::now()).await?;
//!     println!("BTC: {price}");
//!     Ok(())
//! }
//! ```

pub mod binance;
pub mod config;
pub mod error;
pub mod fetch;
pub mod kraken;
pub mod model;
pub mod path;
pub mod resolver;

pub use config::ResolverConfig;
pub use error::{PriceError, Result};
pub use fetch::{FetchClient, HttpFetchClient, MockFetchClient};
pub use model::{Coin, OhlcSample, PriceBracket, Provider, WindowAverage};
pub use resolver::PriceResolver;
