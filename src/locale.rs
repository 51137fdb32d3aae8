//! Locale-aware rendering of numbers, currency amounts and percentages.

use serde::{Deserialize, Serialize};

/// Separates a currency symbol or `%` from the number where a locale wants a gap
pub const NBSP: char = '\u{a0}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyPlacement {
    Prefix, // $12.50
    Suffix, // 12,50 €
}

/// Number rendering conventions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub tag: String,
    pub grouping_separator: String,
    pub decimal_separator: String,
    pub currency_placement: CurrencyPlacement,
    /// Put a no-break space before `%`
    pub percent_spacing: bool,
    pub number_max_fraction_digits: u8,
    pub percent_max_fraction_digits: u8,
}

impl Locale {
    pub fn en_us() -> Self {
        Self {
            tag: "en-US".to_string(),
            grouping_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            currency_placement: CurrencyPlacement::Prefix,
            percent_spacing: false,
            number_max_fraction_digits: 3,
            percent_max_fraction_digits: 2,
        }
    }

    pub fn en_gb() -> Self {
        Self {
            tag: "en-GB".to_string(),
            ..Self::en_us()
        }
    }

    pub fn de_de() -> Self {
        Self {
            tag: "de-DE".to_string(),
            grouping_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
            currency_placement: CurrencyPlacement::Suffix,
            percent_spacing: true,
            ..Self::en_us()
        }
    }

    pub fn fr_fr() -> Self {
        Self {
            tag: "fr-FR".to_string(),
            grouping_separator: "\u{202f}".to_string(),
            decimal_separator: ",".to_string(),
            currency_placement: CurrencyPlacement::Suffix,
            percent_spacing: true,
            ..Self::en_us()
        }
    }

    /// Look up a preset by BCP 47 tag (case-insensitive, `_` accepted for `-`)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.replace('_', "-").to_ascii_lowercase().as_str() {
            "en" | "en-us" => Some(Self::en_us()),
            "en-gb" => Some(Self::en_gb()),
            "de" | "de-de" => Some(Self::de_de()),
            "fr" | "fr-fr" => Some(Self::fr_fr()),
            _ => None,
        }
    }

    /// Grouped decimal with up to `number_max_fraction_digits` digits
    pub fn format_number(&self, value: f64) -> String {
        let (negative, body) = self.decimal_parts(value, 0, self.number_max_fraction_digits);
        if negative {
            format!("-{}", body)
        } else {
            body
        }
    }

    /// Render a ratio as a percentage: 0.42 becomes "42%"
    pub fn format_percent(&self, ratio: f64) -> String {
        let (negative, body) =
            self.decimal_parts(ratio * 100.0, 0, self.percent_max_fraction_digits);
        let sign = if negative { "-" } else { "" };
        if self.percent_spacing {
            format!("{}{}{}%", sign, body, NBSP)
        } else {
            format!("{}{}%", sign, body)
        }
    }

    /// Render an amount in the given ISO 4217 currency
    pub fn format_currency(&self, code: &str, amount: f64) -> String {
        let digits = currency_fraction_digits(code);
        let (negative, body) = self.decimal_parts(amount, digits, digits);
        let sign = if negative { "-" } else { "" };

        match (self.currency_placement, currency_symbol(code)) {
            (CurrencyPlacement::Prefix, Some(symbol)) => format!("{}{}{}", sign, symbol, body),
            (CurrencyPlacement::Prefix, None) => format!("{}{}{}{}", sign, code, NBSP, body),
            (CurrencyPlacement::Suffix, symbol) => {
                format!("{}{}{}{}", sign, body, NBSP, symbol.unwrap_or(code))
            }
        }
    }

    /// Round half away from zero, trim trailing zeros down to `min_fraction`,
    /// and group the integer part. Returns the sign separately.
    fn decimal_parts(&self, value: f64, min_fraction: u8, max_fraction: u8) -> (bool, String) {
        let factor = 10f64.powi(i32::from(max_fraction));
        let scaled = (value * factor).round();
        let rounded = if scaled.is_finite() { scaled / factor } else { value };

        let digits = format!("{:.*}", usize::from(max_fraction), rounded.abs());
        let (integer, fraction) = match digits.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (digits.as_str(), ""),
        };

        let mut fraction = fraction.trim_end_matches('0').to_string();
        while fraction.len() < usize::from(min_fraction) {
            fraction.push('0');
        }

        let mut body = self.group(integer);
        if !fraction.is_empty() {
            body.push_str(&self.decimal_separator);
            body.push_str(&fraction);
        }

        let is_zero = integer.chars().all(|c| c == '0') && fraction.chars().all(|c| c == '0');
        (rounded < 0.0 && !is_zero, body)
    }

    fn group(&self, integer: &str) -> String {
        let len = integer.len();
        let mut grouped = String::with_capacity(len + len / 3 * self.grouping_separator.len());
        for (i, c) in integer.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                grouped.push_str(&self.grouping_separator);
            }
            grouped.push(c);
        }
        grouped
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::en_us()
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        "CNY" => Some("CN¥"),
        _ => None,
    }
}

fn currency_fraction_digits(code: &str) -> u8 {
    match code {
        "JPY" | "KRW" | "ISK" => 0,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_grouping() {
        let locale = Locale::en_us();
        assert_eq!(locale.format_number(8.0), "8");
        assert_eq!(locale.format_number(1234.5), "1,234.5");
        assert_eq!(locale.format_number(1234567.8912), "1,234,567.891");
        assert_eq!(locale.format_number(-999.0), "-999");
        assert_eq!(locale.format_number(0.1 + 0.2), "0.3");
    }

    #[test]
    fn test_negative_zero_after_rounding() {
        let locale = Locale::en_us();
        assert_eq!(locale.format_number(-0.0001), "0");
        assert_eq!(locale.format_number(-0.0), "0");
    }

    #[test]
    fn test_currency() {
        let us = Locale::en_us();
        assert_eq!(us.format_currency("USD", 12.5), "$12.50");
        assert_eq!(us.format_currency("USD", -1234.5), "-$1,234.50");
        assert_eq!(us.format_currency("JPY", 1500.0), "¥1,500");
        assert_eq!(us.format_currency("CHF", 12.5), format!("CHF{}12.50", NBSP));

        let de = Locale::de_de();
        assert_eq!(de.format_currency("EUR", 1234.5), format!("1.234,50{}€", NBSP));
        assert_eq!(de.format_currency("CHF", 3.0), format!("3,00{}CHF", NBSP));
    }

    #[test]
    fn test_percent() {
        assert_eq!(Locale::en_us().format_percent(0.42), "42%");
        assert_eq!(Locale::en_us().format_percent(0.125), "12.5%");
        assert_eq!(Locale::de_de().format_percent(0.42), format!("42{}%", NBSP));
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(Locale::from_tag("de_DE"), Some(Locale::de_de()));
        assert_eq!(Locale::from_tag("EN-gb"), Some(Locale::en_gb()));
        assert_eq!(Locale::from_tag("xx-YY"), None);
    }
}
