use std::env;

use super::LocaleCurrency;

/// Environment variables consulted for the locale, highest precedence first.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MONETARY", "LANG"];

/// Currency of an ISO 3166 region code.
pub fn region_to_currency(region: &str) -> Option<&'static str> {
    match region {
        // North America
        "US" | "PR" | "EC" | "SV" => Some("USD"),
        "CA" => Some("CAD"),
        "MX" => Some("MXN"),

        // South America
        "BR" => Some("BRL"),
        "AR" => Some("ARS"),
        "CL" => Some("CLP"),

        // Eurozone
        "DE" | "FR" | "IT" | "ES" | "NL" | "BE" | "AT" | "PT" | "IE" | "FI" | "GR" | "LU"
        | "SK" | "SI" | "EE" | "LV" | "LT" | "MT" | "CY" | "HR" => Some("EUR"),

        // Rest of Europe
        "GB" => Some("GBP"),
        "CH" | "LI" => Some("CHF"),
        "SE" => Some("SEK"),
        "NO" => Some("NOK"),
        "DK" => Some("DKK"),
        "IS" => Some("ISK"),
        "PL" => Some("PLN"),
        "CZ" => Some("CZK"),
        "HU" => Some("HUF"),
        "RO" => Some("RON"),
        "RU" => Some("RUB"),
        "UA" => Some("UAH"),
        "TR" => Some("TRY"),

        // Asia-Pacific
        "JP" => Some("JPY"),
        "CN" => Some("CNY"),
        "HK" => Some("HKD"),
        "TW" => Some("TWD"),
        "KR" => Some("KRW"),
        "IN" => Some("INR"),
        "ID" => Some("IDR"),
        "TH" => Some("THB"),
        "PH" => Some("PHP"),
        "VN" => Some("VND"),
        "SG" => Some("SGD"),
        "AU" => Some("AUD"),
        "NZ" => Some("NZD"),

        // Middle East & Africa
        "IL" => Some("ILS"),
        "AE" => Some("AED"),
        "ZA" => Some("ZAR"),
        "NG" => Some("NGN"),

        _ => None,
    }
}

/// Extract the region from a POSIX locale name such as `en_GB.UTF-8@euro`.
fn locale_region(locale: &str) -> Option<&str> {
    let name = locale.split(['.', '@']).next()?;
    let (_, region) = name.split_once(['_', '-'])?;
    if region.len() == 2 {
        Some(region)
    } else {
        None
    }
}

/// Resolve the locale currency from the process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvLocaleCurrency;

impl LocaleCurrency for EnvLocaleCurrency {
    fn default_currency_code(&self) -> Option<String> {
        let locale = LOCALE_VARS
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find(|value| !value.is_empty())?;

        let currency = locale_region(&locale)
            .map(str::to_ascii_uppercase)
            .and_then(|region| region_to_currency(&region));

        if currency.is_none() {
            log::debug!("No currency known for locale '{}'", locale);
        }
        currency.map(str::to_string)
    }
}

/// A locale currency fixed at construction.
#[derive(Clone, Debug, Default)]
pub struct FixedLocaleCurrency(pub Option<String>);

impl FixedLocaleCurrency {
    pub fn new(code: &str) -> Self {
        Self(Some(code.to_string()))
    }

    /// A locale whose currency cannot be determined.
    pub fn unknown() -> Self {
        Self(None)
    }
}

impl LocaleCurrency for FixedLocaleCurrency {
    fn default_currency_code(&self) -> Option<String> {
        self.0.clone()
    }
}
