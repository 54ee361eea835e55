use std::collections::BTreeMap;

use serde::Serialize;

use super::rate::ExchangeRate;
use crate::errors::MarketDataError;

/// A complete set of exchange rates keyed by currency code.
///
/// Iteration is always in currency-code order. Tables are built once and then
/// shared read-only; a refresh replaces the whole table.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RateTable {
    rates: BTreeMap<String, ExchangeRate>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table holding a single rate.
    pub fn single(rate: ExchangeRate) -> Result<Self, MarketDataError> {
        let mut table = Self::new();
        table.insert(rate)?;
        Ok(table)
    }

    /// Add a rate, replacing any existing entry for the same code.
    pub fn insert(&mut self, rate: ExchangeRate) -> Result<(), MarketDataError> {
        if !rate.is_valid() {
            return Err(MarketDataError::NonPositiveRate {
                currency_code: rate.currency_code,
                message: format!("{} minor units", rate.fiat_amount),
            });
        }
        self.rates.insert(rate.currency_code.clone(), rate);
        Ok(())
    }

    pub fn get(&self, currency_code: &str) -> Option<&ExchangeRate> {
        self.rates.get(currency_code)
    }

    pub fn contains(&self, currency_code: &str) -> bool {
        self.rates.contains_key(currency_code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Rates in currency-code order.
    pub fn iter(&self) -> impl Iterator<Item = &ExchangeRate> {
        self.rates.values()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }
}
