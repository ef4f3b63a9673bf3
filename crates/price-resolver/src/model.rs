//! Domain Models
//!
//! Core data types for historical price resolution.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PriceError;

/// A priceable asset, crypto or fiat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coin {
    Btc,
    Eos,
    Eth,
    Ltc,
    Xrp,
    Ada,
    Bnb,
    Usd,
    Eur,
    Gbp,
}

impl Coin {
    /// Upper-case ticker as the exchanges spell it
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Eos => "EOS",
            Self::Eth => "ETH",
            Self::Ltc => "LTC",
            Self::Xrp => "XRP",
            Self::Ada => "ADA",
            Self::Bnb => "BNB",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        }
    }

    /// Whether this coin is a fiat currency
    pub const fn is_fiat(self) -> bool {
        matches!(self, Self::Usd | Self::Eur | Self::Gbp)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Coin {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            // Kraken spells bitcoin XBT
            "BTC" | "XBT" => Ok(Self::Btc),
            "EOS" => Ok(Self::Eos),
            "ETH" => Ok(Self::Eth),
            "LTC" => Ok(Self::Ltc),
            "XRP" => Ok(Self::Xrp),
            "ADA" => Ok(Self::Ada),
            "BNB" => Ok(Self::Bnb),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            _ => Err(PriceError::UnknownCoin(s.to_string())),
        }
    }
}

/// Which exchange's trade log originated the pricing request
///
/// Closed set, matched exhaustively. `Default` is priced through Kraken,
/// the fallback source for trade logs that carry no exchange tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Provider {
    #[default]
    Default,
    Kraken,
    Binance,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Default => "default",
            Self::Kraken => "kraken",
            Self::Binance => "binance",
        };
        f.write_str(name)
    }
}

impl FromStr for Provider {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "default" | "unspecified" => Ok(Self::Default),
            "kraken" | "kraken_spot" => Ok(Self::Kraken),
            "binance" | "binance_spot" => Ok(Self::Binance),
            _ => Err(PriceError::UnsupportedProvider(s.to_string())),
        }
    }
}

/// One OHLC candle from an exchange time series
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OhlcSample {
    /// Candle open time, seconds since epoch
    pub time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

/// The two samples surrounding a target timestamp, plus the price
/// extremes observed across every sample scanned while finding them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceBracket {
    /// Last sample at or before the target
    pub before: OhlcSample,
    /// First sample strictly after the target
    pub after: OhlcSample,
    /// Minimum low over the scanned window
    pub low: Decimal,
    /// Maximum high over the scanned window
    pub high: Decimal,
}

impl PriceBracket {
    /// Mid price of the scanned window extremes
    pub fn mid(&self) -> Decimal {
        (self.low + self.high) / Decimal::TWO
    }
}

/// Per-field means over a one-minute candle window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowAverage {
    pub low: Decimal,
    pub high: Decimal,
    pub close: Decimal,
}

impl WindowAverage {
    /// Fold another hop into this one by field-wise multiplication
    pub fn fold(self, other: Self) -> Self {
        Self {
            low: self.low * other.low,
            high: self.high * other.high,
            close: self.close * other.close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_coin_parse() {
        assert_eq!("btc".parse::<Coin>().unwrap(), Coin::Btc);
        assert_eq!("XBT".parse::<Coin>().unwrap(), Coin::Btc);
        assert_eq!("EOS".parse::<Coin>().unwrap(), Coin::Eos);
        assert!(matches!(
            "NOTREAL".parse::<Coin>(),
            Err(PriceError::UnknownCoin(_))
        ));
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("kraken".parse::<Provider>().unwrap(), Provider::Kraken);
        assert_eq!("Binance".parse::<Provider>().unwrap(), Provider::Binance);
        assert_eq!("".parse::<Provider>().unwrap(), Provider::Default);
        assert!(matches!(
            "coinbase".parse::<Provider>(),
            Err(PriceError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn test_bracket_mid() {
        let sample = |time| OhlcSample {
            time,
            open: dec!(1),
            high: dec!(1),
            low: dec!(1),
            close: dec!(1),
        };
        let bracket = PriceBracket {
            before: sample(200),
            after: sample(300),
            low: dec!(8),
            high: dec!(12),
        };
        assert_eq!(bracket.mid(), dec!(10));
    }

    #[test]
    fn test_window_fold_is_commutative() {
        let h1 = WindowAverage { low: dec!(2), high: dec!(3), close: dec!(4) };
        let h2 = WindowAverage { low: dec!(5), high: dec!(6), close: dec!(7) };
        assert_eq!(h1.fold(h2), h2.fold(h1));
        assert_eq!(h1.fold(h2).close, dec!(28));
    }
}
