//! # Document Formatting
//!
//! Amounts, dates and file names as they appear in generated documents.
//!
//! ## Amount Policy
//! One policy everywhere: two decimals with thousands grouping. Screens use
//! the `₱` sign; PDFs use `PHP ` because the builtin Helvetica encoding has
//! no peso glyph.
//!
//! ```text
//!   Money(123450)   screen: ₱1,234.50     pdf: PHP 1,234.50
//!   Money(-8000)    screen: -₱80.00       pdf: -PHP 80.00
//! ```

use chrono::{DateTime, FixedOffset, Utc};
use clinic_core::money::Money;

/// Currency marker used inside PDFs.
pub const PDF_CURRENCY: &str = "PHP ";

/// `PHP 1,234.50`
pub fn pdf_money(amount: Money) -> String {
    amount.format_with(PDF_CURRENCY)
}

/// `-PHP 80.00` for a deduction.
pub fn pdf_deduction(amount: Money) -> String {
    format!("-{}", pdf_money(amount.abs()))
}

/// `March 05, 2026 02:30 PM` in clinic local time.
pub fn long_timestamp(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset)
        .format("%B %d, %Y %I:%M %p")
        .to_string()
}

/// `03/05/2026`
pub fn short_date(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%m/%d/%Y").to_string()
}

/// `02:30 PM`
pub fn short_time(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%I:%M %p").to_string()
}

/// Reduces a free-text value to `[A-Za-z0-9._-]` for use in a file name.
///
/// Every other character becomes `_`, one for one. Falls back to `fallback`
/// when no letter or digit survives.
pub fn sanitize_file_component(input: &str, fallback: &str) -> String {
    let out: String = input
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = out.trim_matches('.');
    if trimmed.chars().any(|c| c.is_ascii_alphanumeric()) {
        trimmed.to_string()
    } else {
        fallback.to_string()
    }
}

/// `receipt-<customer>-<transaction id>.pdf`
pub fn receipt_file_name(customer_name: &str, transaction_id: &str) -> String {
    format!(
        "receipt-{}-{}.pdf",
        sanitize_file_component(customer_name, "customer"),
        sanitize_file_component(transaction_id, "transaction")
    )
}

/// `invoice-<transaction id>-<epoch millis>.pdf`
///
/// The millisecond suffix keeps repeated downloads of the same invoice from
/// colliding.
pub fn invoice_file_name(transaction_id: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        "invoice-{}-{}.pdf",
        sanitize_file_component(transaction_id, "transaction"),
        generated_at.timestamp_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn manila() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn test_pdf_money() {
        assert_eq!(pdf_money(Money::from_cents(123_450)), "PHP 1,234.50");
        assert_eq!(pdf_money(Money::zero()), "PHP 0.00");
        assert_eq!(pdf_deduction(Money::from_pesos(80)), "-PHP 80.00");
    }

    #[test]
    fn test_dates_use_offset() {
        let at = Utc.with_ymd_and_hms(2026, 3, 4, 22, 30, 0).unwrap();
        assert_eq!(short_date(at, manila()), "03/05/2026");
        assert_eq!(short_time(at, manila()), "06:30 AM");
        assert_eq!(long_timestamp(at, manila()), "March 05, 2026 06:30 AM");
    }

    #[test]
    fn test_sanitize_file_component() {
        assert_eq!(sanitize_file_component("Ana Reyes", "x"), "Ana_Reyes");
        assert_eq!(sanitize_file_component("Ana  Reyes", "x"), "Ana__Reyes");
        assert_eq!(sanitize_file_component("../etc/passwd", "x"), "_etc_passwd");
        assert_eq!(sanitize_file_component("José Peña", "x"), "Jos__Pe_a");
        assert_eq!(sanitize_file_component("   ", "customer"), "customer");
        assert_eq!(sanitize_file_component("日本", "customer"), "customer");
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            receipt_file_name("Ana Reyes", "abc-123"),
            "receipt-Ana_Reyes-abc-123.pdf"
        );
        assert_eq!(receipt_file_name("", "abc"), "receipt-customer-abc.pdf");

        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(invoice_file_name("abc", at), "invoice-abc-1700000000123.pdf");
    }
}
