use std::sync::Arc;

use ratefeed_market_data::{ExchangeRate, RateTable};

use crate::currency::{CurrencySymbols, LocaleCurrency};

/// Read-only queries over one rate table.
///
/// Every method takes the table explicitly so callers answer from a single
/// snapshot. An absent table behaves like an empty one.
pub struct QueryResolver {
    symbols: Arc<dyn CurrencySymbols>,
    locale: Arc<dyn LocaleCurrency>,
    fallback_currency: String,
}

impl QueryResolver {
    pub fn new(
        symbols: Arc<dyn CurrencySymbols>,
        locale: Arc<dyn LocaleCurrency>,
        fallback_currency: impl Into<String>,
    ) -> Self {
        Self {
            symbols,
            locale,
            fallback_currency: fallback_currency.into(),
        }
    }

    /// All rates, code-sorted.
    pub fn list(&self, table: Option<&RateTable>) -> Vec<ExchangeRate> {
        table
            .map(|table| table.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Rates whose code or symbol contains `text`, ignoring case.
    pub fn search(&self, table: Option<&RateTable>, text: &str) -> Vec<ExchangeRate> {
        let needle = text.to_lowercase();
        let Some(table) = table else {
            return Vec::new();
        };

        table
            .iter()
            .filter(|rate| needle.is_empty() || self.matches(rate, &needle))
            .cloned()
            .collect()
    }

    fn matches(&self, rate: &ExchangeRate, needle: &str) -> bool {
        if rate.currency_code.to_lowercase().contains(needle) {
            return true;
        }
        self.symbols
            .symbol_for(&rate.currency_code)
            .is_some_and(|symbol| symbol.to_lowercase().contains(needle))
    }

    /// The rate for `code`, else for the locale currency, else for the
    /// fallback currency.
    pub fn best_for(&self, table: Option<&RateTable>, code: Option<&str>) -> Option<ExchangeRate> {
        let table = table?;

        if let Some(rate) = code.and_then(|code| table.get(code)) {
            return Some(rate.clone());
        }

        if let Some(rate) = self
            .locale
            .default_currency_code()
            .and_then(|code| table.get(&code))
        {
            return Some(rate.clone());
        }

        table.get(&self.fallback_currency).cloned()
    }

    pub fn symbol_for(&self, code: &str) -> Option<String> {
        self.symbols.symbol_for(code)
    }
}
