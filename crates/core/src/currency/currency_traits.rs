/// Looks up the display symbol of a currency code (`EUR` -> `€`).
pub trait CurrencySymbols: Send + Sync {
    fn symbol_for(&self, code: &str) -> Option<String>;
}

/// Provides the currency of the user's locale.
pub trait LocaleCurrency: Send + Sync {
    /// The locale's default currency code, or `None` when it cannot be determined.
    fn default_currency_code(&self) -> Option<String>;
}
