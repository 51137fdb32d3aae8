use locad::locale::NBSP;
use locad::{classify, format_value, CellValue, Locale, ValueFormatter, ERROR_MARKER};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn shown(formatter: &ValueFormatter, raw: &str) -> String {
    formatter.format(Some(raw), false).unwrap()
}

#[test]
fn test_classification_examples() {
    assert_eq!(format_value(Some("USD 12.50"), false).as_deref(), Some("$12.50"));
    assert_eq!(format_value(Some("42%"), false).as_deref(), Some("42%"));
    assert_eq!(format_value(Some("=2+2*3"), false).as_deref(), Some("8"));
    assert_eq!(format_value(Some("012.50"), false).as_deref(), Some("012.50"));
    assert_eq!(format_value(Some("=1/0"), false).as_deref(), Some(ERROR_MARKER));
}

#[test]
fn test_currency_before_everything_else() {
    assert_eq!(
        classify("EUR 5"),
        CellValue::Currency { code: "EUR".into(), amount: 5.0 }
    );
    // A formula behind a currency code is not evaluated
    assert_eq!(classify("USD =1+1"), CellValue::Text("USD =1+1".into()));
}

#[test]
fn test_formulas() {
    let formatter = ValueFormatter::default();
    assert_eq!(shown(&formatter, "= 2 * (3 + 4)"), "14");
    assert_eq!(shown(&formatter, "=1/3"), "0.333");
    assert_eq!(shown(&formatter, "=1000*1000"), "1,000,000");
    assert_eq!(shown(&formatter, "=abc"), ERROR_MARKER);
    assert_eq!(shown(&formatter, "="), ERROR_MARKER);
    assert_eq!(shown(&formatter, "=0/0"), ERROR_MARKER);
}

#[test]
fn test_text_is_verbatim() {
    let formatter = ValueFormatter::default();
    for raw in ["hello world", "1,000", "1e3", "+5", "12 apples", "$12"] {
        assert_eq!(shown(&formatter, raw), raw);
    }
}

#[test]
fn test_german_rendering() {
    let formatter = ValueFormatter::new(Locale::de_de());
    assert_eq!(shown(&formatter, "USD 12.50"), format!("12,50{}$", NBSP));
    assert_eq!(shown(&formatter, "42%"), format!("42{}%", NBSP));
    assert_eq!(shown(&formatter, "=7/2"), "3,5");
    assert_eq!(shown(&formatter, "1234567"), "1.234.567");
}

#[test]
fn test_french_rendering() {
    let formatter = ValueFormatter::new(Locale::fr_fr());
    assert_eq!(shown(&formatter, "1234.5"), "1\u{202f}234,5");
    assert_eq!(shown(&formatter, "EUR 3"), format!("3,00{}€", NBSP));
}

#[test]
fn test_absent_value() {
    let formatter = ValueFormatter::new(Locale::en_gb());
    assert_eq!(formatter.format(None, false), None);
    assert_eq!(formatter.format(None, true), None);
}

proptest! {
    #[test]
    fn prop_editing_shows_raw_text(raw in ".*") {
        prop_assert_eq!(format_value(Some(&raw), true), Some(raw.clone()));
        prop_assert_eq!(
            ValueFormatter::new(Locale::de_de()).format(Some(&raw), true),
            Some(raw)
        );
    }

    #[test]
    fn prop_formulas_never_fail_to_render(expression in "[0-9+*/(). -]{0,12}") {
        let raw = format!("={}", expression);
        let rendered = format_value(Some(&raw), false);
        prop_assert!(rendered.is_some());
        prop_assert!(!rendered.unwrap().is_empty());
    }

    #[test]
    fn prop_plain_words_stay_text(word in "[a-z]{1,10}") {
        prop_assert_eq!(classify(&word), CellValue::Text(word.clone()));
    }
}
