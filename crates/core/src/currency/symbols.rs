use super::CurrencySymbols;

/// Symbol for a currency code, for the currencies the price lists commonly carry.
pub fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        // Americas
        "USD" => Some("$"),
        "CAD" => Some("CA$"),
        "MXN" => Some("MX$"),
        "BRL" => Some("R$"),
        "ARS" => Some("AR$"),
        "CLP" => Some("CLP$"),

        // Europe
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "CHF" => Some("CHF"),
        "SEK" => Some("kr"),
        "NOK" => Some("kr"),
        "DKK" => Some("kr"),
        "ISK" => Some("kr"),
        "PLN" => Some("zł"),
        "CZK" => Some("Kč"),
        "HUF" => Some("Ft"),
        "RON" => Some("lei"),
        "RUB" => Some("₽"),
        "UAH" => Some("₴"),
        "TRY" => Some("₺"),

        // Asia-Pacific
        "JPY" => Some("¥"),
        "CNY" => Some("CN¥"),
        "HKD" => Some("HK$"),
        "TWD" => Some("NT$"),
        "KRW" => Some("₩"),
        "INR" => Some("₹"),
        "IDR" => Some("Rp"),
        "THB" => Some("฿"),
        "PHP" => Some("₱"),
        "VND" => Some("₫"),
        "SGD" => Some("S$"),
        "AUD" => Some("A$"),
        "NZD" => Some("NZ$"),

        // Middle East & Africa
        "ILS" => Some("₪"),
        "AED" => Some("د.إ"),
        "ZAR" => Some("R"),
        "NGN" => Some("₦"),

        _ => None,
    }
}

/// [`CurrencySymbols`] backed by [`currency_symbol`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticCurrencySymbols;

impl CurrencySymbols for StaticCurrencySymbols {
    fn symbol_for(&self, code: &str) -> Option<String> {
        currency_symbol(code).map(str::to_string)
    }
}
