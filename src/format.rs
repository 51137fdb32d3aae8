//! Display formatting for raw entry values.
//!
//! Values are stored exactly as typed. Formatting is display-only: a raw
//! value is classified as currency, percent, formula, number or text and
//! rendered through a [`Locale`]. While a cell is being edited the raw text
//! is shown unchanged.

use crate::Locale;
use evalexpr::Value;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Shown in place of a formula that cannot be evaluated
pub const ERROR_MARKER: &str = "#ERROR";

/// How a raw value was interpreted
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Currency { code: String, amount: f64 },
    /// Stored as a ratio: "42%" is 0.42
    Percent(f64),
    Formula(Result<f64, FormulaError>),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("formula may only contain digits, '.', parentheses, + - * / and whitespace")]
    Rejected,

    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error("formula result is not a number")]
    NotANumber,

    #[error("formula result is not finite")]
    NonFinite,
}

fn canonical_number() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?(0|[1-9][0-9]*)(\.[0-9]+)?$").expect("valid pattern"))
}

fn currency_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Z]{3})\s*(.*)$").expect("valid pattern"))
}

fn currency_suffix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.*?)\s*([A-Z]{3})$").expect("valid pattern"))
}

fn formula_gate() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9.()+\-*/\s]+$").expect("valid pattern"))
}

fn number_literal() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9.]+").expect("valid pattern"))
}

/// Parse text that is already in canonical decimal form.
///
/// "12.5", "12.50", "-3" and "0.25" are accepted; "012.50", "+5", ".5",
/// "5.", "1e3" and padded text are not.
pub fn parse_canonical(text: &str) -> Option<f64> {
    if !canonical_number().is_match(text) {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Classify a raw value. The first interpretation that fits wins:
/// currency, percent, formula, number, then text.
pub fn classify(raw: &str) -> CellValue {
    if let Some((code, amount)) = parse_currency(raw) {
        return CellValue::Currency { code, amount };
    }

    if let Some(number) = raw.strip_suffix('%') {
        if let Some(value) = parse_canonical(number.trim()) {
            return CellValue::Percent(value / 100.0);
        }
    }

    if let Some(expression) = raw.strip_prefix('=') {
        return CellValue::Formula(evaluate_formula(expression));
    }

    if let Some(value) = parse_canonical(raw) {
        return CellValue::Number(value);
    }

    CellValue::Text(raw.to_string())
}

fn parse_currency(raw: &str) -> Option<(String, f64)> {
    let candidates = [
        currency_prefix().captures(raw).map(|c| (c[1].to_string(), c[2].to_string())),
        currency_suffix().captures(raw).map(|c| (c[2].to_string(), c[1].to_string())),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(|(code, rest)| parse_canonical(rest.trim()).map(|amount| (code, amount)))
}

/// Evaluate an arithmetic expression (the part after `=`).
///
/// Only digits, `.`, parentheses, `+ - * /` and whitespace pass the gate.
/// Every literal is evaluated as floating point, so `7/2` is 3.5.
pub fn evaluate_formula(expression: &str) -> Result<f64, FormulaError> {
    if !formula_gate().is_match(expression) {
        return Err(FormulaError::Rejected);
    }

    let prepared = prepare_literals(expression)?;
    let result = evalexpr::eval(&prepared).map_err(|e| FormulaError::Evaluation(e.to_string()))?;

    let value = match result {
        Value::Float(f) => f,
        Value::Int(i) => i as f64,
        _ => return Err(FormulaError::NotANumber),
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormulaError::NonFinite)
    }
}

/// Rewrite every numeric literal as a float literal so evalexpr never
/// falls back to integer arithmetic
fn prepare_literals(expression: &str) -> Result<String, FormulaError> {
    let mut result = String::with_capacity(expression.len() + 8);
    let mut last_end = 0;

    for literal in number_literal().find_iter(expression) {
        let text = literal.as_str();
        if text.parse::<f64>().is_err() {
            return Err(FormulaError::Evaluation(format!(
                "invalid number literal: {}",
                text
            )));
        }

        result.push_str(&expression[last_end..literal.start()]);
        if text.starts_with('.') {
            result.push('0');
        }
        result.push_str(text);
        if text.ends_with('.') {
            result.push('0');
        } else if !text.contains('.') {
            result.push_str(".0");
        }
        last_end = literal.end();
    }

    result.push_str(&expression[last_end..]);
    Ok(result)
}

/// Renders raw values for display using a locale
#[derive(Debug, Clone, Default)]
pub struct ValueFormatter {
    locale: Locale,
}

impl ValueFormatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Display text for a cell. Absent stays absent; editing shows the raw text.
    pub fn format(&self, raw: Option<&str>, is_editing: bool) -> Option<String> {
        let raw = raw?;
        if is_editing {
            return Some(raw.to_string());
        }
        Some(self.render(&classify(raw)))
    }

    pub fn render(&self, value: &CellValue) -> String {
        match value {
            CellValue::Currency { code, amount } => self.locale.format_currency(code, *amount),
            CellValue::Percent(ratio) => self.locale.format_percent(*ratio),
            CellValue::Formula(Ok(result)) => self.locale.format_number(*result),
            CellValue::Formula(Err(_)) => ERROR_MARKER.to_string(),
            CellValue::Number(value) => self.locale.format_number(*value),
            CellValue::Text(text) => text.clone(),
        }
    }
}

/// Format with the default (en-US) locale
pub fn format_value(raw: Option<&str>, is_editing: bool) -> Option<String> {
    ValueFormatter::default().format(raw, is_editing)
}
