//! Date recognition for receipt date tokens.

use chrono::NaiveDate;

/// Formats seen on bank counterfoils and tax department receipts.
pub const RECEIPT_DATE_FORMATS: [&str; 4] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%d-%b-%Y"];

/// Parse a date token such as `31/03/2021` or `31-Mar-2021`.
pub fn parse_receipt_date(token: &str) -> Option<NaiveDate> {
    let token = token.trim();
    RECEIPT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
}
