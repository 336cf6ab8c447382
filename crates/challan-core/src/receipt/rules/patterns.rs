//! Label patterns for tax department challan receipts.

use lazy_static::lazy_static;
use regex::Regex;

/// Currency marker preceding amounts in the tax breakup section.
pub const RUPEE: char = '₹';

lazy_static! {
    // "Label : value" lines; the value follows the first colon after the label
    pub static ref NATURE_OF_PAYMENT: Regex = Regex::new(
        r"Nature of Payment[^:]*:(.*)$"
    ).unwrap();

    pub static ref AMOUNT_IN_RS: Regex = Regex::new(
        r"Amount \(in Rs\.\)[^:]*:(.*)$"
    ).unwrap();

    pub static ref CHALLAN_NO: Regex = Regex::new(
        r"Challan No[^:]*:(.*)$"
    ).unwrap();

    pub static ref TENDER_DATE: Regex = Regex::new(
        r"Tender Date[^:]*:(.*)$"
    ).unwrap();

    // Letter-coded breakup lines (D, E, F, total); the value follows the last rupee sign
    pub static ref BREAKUP_INTEREST: Regex = Regex::new(
        r"^DInterest.*₹(.*)$"
    ).unwrap();

    pub static ref BREAKUP_PENALTY: Regex = Regex::new(
        r"^EPenalty.*₹(.*)$"
    ).unwrap();

    pub static ref BREAKUP_FEE_234E: Regex = Regex::new(
        r"^FFee under section 234E.*₹(.*)$"
    ).unwrap();

    pub static ref BREAKUP_TOTAL: Regex = Regex::new(
        r"^Total \(A\+B\+C\+D\+E\+F\).*₹(.*)$"
    ).unwrap();
}
