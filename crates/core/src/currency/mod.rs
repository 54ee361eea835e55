//! Currency display collaborators: symbols and the locale's default currency.

mod currency_traits;
mod locale;
mod symbols;

pub use currency_traits::{CurrencySymbols, LocaleCurrency};
pub use locale::{region_to_currency, EnvLocaleCurrency, FixedLocaleCurrency};
pub use symbols::{currency_symbol, StaticCurrencySymbols};
