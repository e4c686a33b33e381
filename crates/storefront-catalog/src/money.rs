//! Money type for representing and formatting prices.
//!
//! The feed carries prices as plain numbers. They are converted to the
//! smallest currency unit once, so formatting never goes through float
//! rounding twice.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    CLP,
    USD,
    EUR,
}

impl Currency {
    /// Get the currency code (e.g., "CLP").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::CLP => "CLP",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::CLP | Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::CLP => 0,
            _ => 2,
        }
    }

    /// Thousands and decimal separators used in the currency's home locale.
    pub fn separators(&self) -> (char, char) {
        match self {
            Currency::CLP | Currency::EUR => ('.', ','),
            Currency::USD => (',', '.'),
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "CLP" => Some(Currency::CLP),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (pesos for CLP,
/// cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit.
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use storefront_catalog::money::{Money, Currency};
    /// let price = Money::from_decimal(49.99, Currency::USD);
    /// assert_eq!(price.amount_minor, 4999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let multiplier = 10_i64.pow(currency.decimal_places());
        let amount_minor = (amount * multiplier as f64).round() as i64;
        Self::new(amount_minor, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_minor as f64 / divisor as f64
    }

    /// Storefront style: symbol, locale grouping, trailing code
    /// (e.g., "$12.990 CLP").
    pub fn display(&self) -> String {
        let (group, decimal) = self.currency.separators();
        format!(
            "{}{} {}",
            self.currency.symbol(),
            self.grouped(group, decimal),
            self.currency.code()
        )
    }

    /// Back-office style: leading code, en-US grouping (e.g., "CLP 12,990").
    pub fn display_code(&self) -> String {
        format!("{} {}", self.currency.code(), self.grouped(',', '.'))
    }

    /// Format as a display string without symbol or code (e.g., "12.990").
    pub fn display_amount(&self) -> String {
        let (group, decimal) = self.currency.separators();
        self.grouped(group, decimal)
    }

    fn grouped(&self, group: char, decimal: char) -> String {
        let places = self.currency.decimal_places();
        let divisor = 10_u64.pow(places);
        let abs = self.amount_minor.unsigned_abs();
        let whole = abs / divisor;
        let fraction = abs % divisor;

        let digits = whole.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 4);
        if self.is_negative() {
            out.push('-');
        }
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(group);
            }
            out.push(ch);
        }
        if places > 0 {
            out.push(decimal);
            out.push_str(&format!("{:0width$}", fraction, width = places as usize));
        }
        out
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
