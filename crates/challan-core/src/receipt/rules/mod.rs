//! Value parsers and label patterns shared by the receipt extractors.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::{
    format_amount, format_indian_amount, parse_amount, parse_integer, round_amount,
    strip_separators,
};
pub use dates::{parse_receipt_date, RECEIPT_DATE_FORMATS};
pub use patterns::RUPEE;
