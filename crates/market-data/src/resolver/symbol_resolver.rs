use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    /// Display label (normalized) to tradable market symbol.
    static ref MARKET_SYMBOLS: HashMap<&'static str, &'static str> = HashMap::from([
        // Commodities via their most liquid ETF
        ("GOLD", "GLD"),
        ("XAU", "GLD"),
        ("SILVER", "SLV"),
        ("XAG", "SLV"),
        ("OIL", "USO"),
        ("CRUDE", "USO"),
        ("CRUDEOIL", "USO"),
        ("NATGAS", "UNG"),
        ("NATURALGAS", "UNG"),
        ("COPPER", "CPER"),
        ("PLATINUM", "PPLT"),
        ("PALLADIUM", "PALL"),
        // Crypto
        ("BTC", "BTC-USD"),
        ("BITCOIN", "BTC-USD"),
        ("ETH", "ETH-USD"),
        ("ETHEREUM", "ETH-USD"),
        ("SOL", "SOL-USD"),
        ("SOLANA", "SOL-USD"),
        ("XRP", "XRP-USD"),
        ("DOGE", "DOGE-USD"),
        ("DOGECOIN", "DOGE-USD"),
        ("ADA", "ADA-USD"),
        ("LTC", "LTC-USD"),
        // Indices via tracking ETFs
        ("SP500", "SPY"),
        ("SPX", "SPY"),
        ("NASDAQ", "QQQ"),
        ("NDX", "QQQ"),
        ("DOW", "DIA"),
        ("DJIA", "DIA"),
        ("RUSSELL", "IWM"),
        ("RUSSELL2000", "IWM"),
        // FX
        ("EURUSD", "EURUSD=X"),
        ("GBPUSD", "GBPUSD=X"),
        ("USDJPY", "JPY=X"),
    ]);
}

/// Strip everything but ASCII letters and digits, then upper-case.
pub fn normalize_symbol(display_symbol: &str) -> String {
    display_symbol
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Map a user-facing asset label to the symbol used for price lookups.
///
/// Symbols without a table entry pass through unchanged, so "BRK.B" stays
/// "BRK.B" rather than becoming "BRKB".
pub fn resolve_market_symbol(display_symbol: &str) -> String {
    match MARKET_SYMBOLS.get(normalize_symbol(display_symbol).as_str()) {
        Some(market_symbol) => (*market_symbol).to_string(),
        None => display_symbol.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels_resolve() {
        assert_eq!(resolve_market_symbol("GOLD"), "GLD");
        assert_eq!(resolve_market_symbol("BTC"), "BTC-USD");
        assert_eq!(resolve_market_symbol("SP500"), "SPY");
    }

    #[test]
    fn test_normalization_before_lookup() {
        assert_eq!(resolve_market_symbol("gold "), "GLD");
        assert_eq!(resolve_market_symbol("btc/"), "BTC-USD");
        assert_eq!(resolve_market_symbol("S&P 500"), "SPY");
        assert_eq!(resolve_market_symbol("eur/usd"), "EURUSD=X");
    }

    #[test]
    fn test_unknown_symbols_pass_through() {
        assert_eq!(resolve_market_symbol("AAPL"), "AAPL");
        assert_eq!(resolve_market_symbol("BRK.B"), "BRK.B");
        assert_eq!(resolve_market_symbol("Brk.B"), "Brk.B");
        assert_eq!(resolve_market_symbol(" msft "), " msft ");
        assert_eq!(resolve_market_symbol("BTC-USD"), "BTC-USD");
        assert_eq!(resolve_market_symbol(""), "");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        for label in ["GOLD", "ETH", "NASDAQ", "MSFT", "USDJPY"] {
            let once = resolve_market_symbol(label);
            assert_eq!(resolve_market_symbol(&once), once, "label {}", label);
        }
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" brk.b "), "BRKB");
        assert_eq!(normalize_symbol("btc-usd"), "BTCUSD");
    }
}
