//! Text formatting helpers shared by the views.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use unicode_segmentation::UnicodeSegmentation;

use crate::transaction::AmountTotal;

/// The longest description shown on a goal card before it is cut off.
pub const SUMMARY_LENGTH: usize = 60;

/// Format a whole shilling amount, e.g. "Tzs. 1,500".
pub fn format_currency(amount: impl Into<AmountTotal>) -> String {
    let amount: AmountTotal = amount.into();

    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("Tzs. ")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(0)))
    });

    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-Tzs. ")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(0)))
    });

    let formatter = if amount < 0 {
        negative_fmt
    } else {
        positive_fmt
    };

    match formatter {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        _ if amount == 0 => "Tzs. 0".to_owned(),
        Some(formatter) => formatter.fmt_string(amount.unsigned_abs() as f64),
        None if amount < 0 => format!("-Tzs. {}", amount.unsigned_abs()),
        None => format!("Tzs. {amount}"),
    }
}

/// Format a dollar amount with cents, e.g. "$520.50".
pub fn format_dollars(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let formatter = if number < 0.0 {
        negative_fmt
    } else {
        positive_fmt
    };

    let mut formatted_string = match formatter {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        _ if number == 0.0 => return "$0.00".to_owned(),
        Some(formatter) => formatter.fmt_string(number.abs()),
        None if number < 0.0 => format!("-${:.2}", number.abs()),
        None => format!("${number:.2}"),
    };

    // numfmt drops trailing zeros, so "12.30" is rendered as "12.3" and "12.00"
    // as "12". Pad the cents back out to two digits.
    match formatted_string.find('.') {
        None => formatted_string.push_str(".00"),
        Some(dot) if formatted_string.len() - dot == 2 => formatted_string.push('0'),
        Some(_) => {}
    }

    formatted_string
}

/// Cut `text` down to [SUMMARY_LENGTH] grapheme clusters, adding "..." if
/// anything was removed.
pub fn truncate_summary(text: &str) -> String {
    let mut graphemes = text.graphemes(true);
    let summary: String = graphemes.by_ref().take(SUMMARY_LENGTH).collect();

    if graphemes.next().is_some() {
        format!("{summary}...")
    } else {
        summary
    }
}

#[cfg(test)]
mod format_currency_tests {
    use super::format_currency;

    #[test]
    fn formats_zero() {
        assert_eq!(format_currency(0), "Tzs. 0");
    }

    #[test]
    fn formats_small_amount() {
        assert_eq!(format_currency(500), "Tzs. 500");
    }

    #[test]
    fn separates_thousands() {
        assert_eq!(format_currency(1500), "Tzs. 1,500");
    }

    #[test]
    fn formats_negative_amount() {
        assert_eq!(format_currency(-100), "-Tzs. 100");
    }
}

#[cfg(test)]
mod format_dollars_tests {
    use super::format_dollars;

    #[test]
    fn formats_zero() {
        assert_eq!(format_dollars(0.0), "$0.00");
    }

    #[test]
    fn always_shows_two_decimal_places() {
        for (number, want) in [(12.3, "$12.30"), (12.35, "$12.35"), (280.0, "$280.00")] {
            assert_eq!(format_dollars(number), want);
        }
    }
}
