//! Path Resolver
//!
//! Pure bridging logic: which trading-pair symbols connect a coin to a
//! quotable base. Both functions return a sequence so providers that
//! need multi-hop bridges can be added without changing callers.

use crate::error::{PriceError, Result};
use crate::model::{Coin, Provider};

/// Pairs bridging `coin` to the configured fiat on Kraken
///
/// Kraken quotes bitcoin as XBT against fiat directly, so the only
/// supported bridges are the XBT/fiat pair for BTC and EOS. EOS riding
/// the XBT pair is inherited behavior from the trade logs this engine
/// was built for; other coins are rejected rather than silently priced
/// through the wrong pair.
pub fn kraken_path(coin: Coin, fiat: Coin) -> Result<Vec<String>> {
    if coin == fiat {
        return Ok(Vec::new());
    }

    match coin {
        Coin::Btc | Coin::Eos => Ok(vec![format!("XBT{fiat}")]),
        _ => Err(PriceError::UnsupportedCoin {
            coin,
            provider: Provider::Kraken,
        }),
    }
}

/// Pairs bridging `coin` to BTC on Binance
///
/// BTC itself needs no hop; everything else trades against BTC under
/// the concatenated symbol.
pub fn binance_path(coin: Coin) -> Vec<String> {
    match coin {
        Coin::Btc => Vec::new(),
        _ => vec![format!("{coin}BTC")],
    }
}
