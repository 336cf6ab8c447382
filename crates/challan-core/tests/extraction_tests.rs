//! End-to-end extraction tests against converted receipt fixtures.

use std::path::PathBuf;
use std::str::FromStr;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use challan_core::models::table::Column;
use challan_core::{
    process_documents, BankField, BankReceiptExtractor, Cell, ExtractionError, ReceiptExtractor,
    ReceiptKind, SourceDocument, TaxField, TaxReceiptExtractor,
};

// ============================================================================
// Fixture helpers
// ============================================================================

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Missing fixture: {}", path.display()))
}

fn bank_text() -> String {
    fixture("hdfc_receipt.txt")
}

fn tax_text() -> String {
    fixture("itd_receipt.txt")
}

// ============================================================================
// Bank receipts
// ============================================================================

#[test]
fn bank_receipt_has_all_eleven_fields() {
    let extraction = BankReceiptExtractor::new()
        .extract_from_text(&bank_text())
        .unwrap();
    let record = extraction.record.as_bank().unwrap();

    for field in BankField::ALL {
        match (field, record.cell(field)) {
            (BankField::ChallanNo | BankField::ChallanSerialNo, Cell::Integer(_)) => {}
            (
                BankField::BasicTax
                | BankField::Interest
                | BankField::Penalty
                | BankField::FeeUnderSection234E
                | BankField::Total,
                Cell::Decimal(value),
            ) => assert!(!value.to_string().contains(',')),
            (_, Cell::Text(_)) => {}
            (field, cell) => panic!("unexpected cell for {}: {:?}", field, cell),
        }
    }

    assert_eq!(record.receipt_date, "31/03/2021");
    assert_eq!(record.total, Decimal::from_str("124050.50").unwrap());
    assert_eq!(record.challan_serial_no, 10234);
}

#[test]
fn bank_receipt_date_is_last_token_of_line_twelve() {
    let lines: Vec<String> = (0..20)
        .map(|i| match i {
            7 => "Nature of Payment 94C".to_string(),
            9 => "Basic Tax 10.00".to_string(),
            10 => "Challan No 1".to_string(),
            12 => "Penalty 0.00 Date Of Receipt 31/03/2021".to_string(),
            13 => "Serial 2".to_string(),
            14 => "Interest 0.00".to_string(),
            15 => "Fee Under Sec.234E 0.00".to_string(),
            16 => "TOTAL 10.00 Drawn on SBI".to_string(),
            19 => "Realised 01/04/2021".to_string(),
            _ => format!("filler {}", i),
        })
        .collect();

    let extraction = BankReceiptExtractor::new()
        .extract_from_text(&lines.join("\n"))
        .unwrap();

    assert_eq!(
        extraction.record.as_bank().unwrap().receipt_date,
        "31/03/2021"
    );
}

#[test]
fn truncated_bank_receipt_is_out_of_range() {
    let text = bank_text();

    for keep in [0, 1, 10, 19] {
        let truncated = text.lines().take(keep).collect::<Vec<_>>().join("\n");
        let err = BankReceiptExtractor::new()
            .extract_from_text(&truncated)
            .unwrap_err();
        assert!(
            matches!(err, ExtractionError::OutOfRange { len, .. } if len == keep),
            "{} lines gave {:?}",
            keep,
            err
        );
    }
}

#[test]
fn extraction_is_idempotent() {
    let bank = BankReceiptExtractor::new();
    let tax = TaxReceiptExtractor::new();

    assert_eq!(
        bank.extract_from_text(&bank_text()).unwrap(),
        bank.extract_from_text(&bank_text()).unwrap()
    );
    assert_eq!(
        tax.extract_from_text(&tax_text()).unwrap(),
        tax.extract_from_text(&tax_text()).unwrap()
    );
}

// ============================================================================
// Tax receipts
// ============================================================================

#[test]
fn tax_receipt_values_are_clean() {
    let extraction = TaxReceiptExtractor::new()
        .extract_from_text(&tax_text())
        .unwrap();
    let record = extraction.record.as_tax().unwrap();

    assert_eq!(record.len(), TaxField::ALL.len());
    assert_eq!(record.get(TaxField::Amount), Some("1,24,050"));
    assert_eq!(record.get(TaxField::ChallanNo), Some("00457"));
    assert_eq!(record.get(TaxField::FeeUnderSection234E), Some("200"));

    for (_, value) in record.iter() {
        assert_eq!(value, value.trim());
        assert!(!value.contains('₹'));
    }
}

#[test]
fn tax_receipt_nature_of_payment() {
    let extraction = TaxReceiptExtractor::new()
        .extract_from_text("Challan Receipt\nNature of Payment: TDS on Salary\n")
        .unwrap();

    assert_eq!(
        extraction.record.as_tax().unwrap().get(TaxField::NatureOfPayment),
        Some("TDS on Salary")
    );
}

#[test]
fn tax_receipt_subset_is_exact() {
    let text: String = tax_text()
        .lines()
        .filter(|l| l.starts_with("Challan No") || l.starts_with("EPenalty"))
        .collect::<Vec<_>>()
        .join("\n");

    let extraction = TaxReceiptExtractor::new().extract_from_text(&text).unwrap();
    let fields: Vec<TaxField> = extraction
        .record
        .as_tax()
        .unwrap()
        .iter()
        .map(|(field, _)| field)
        .collect();

    assert_eq!(fields, vec![TaxField::ChallanNo, TaxField::Penalty]);
}

#[test]
fn bank_text_is_not_a_tax_receipt() {
    // The bank counterfoil has "Challan No" without a colon.
    let err = TaxReceiptExtractor::new()
        .extract_from_text("HDFC BANK LIMITED\nBSR Code 0510308 Challan No 00457")
        .unwrap_err();
    assert_eq!(err, ExtractionError::NotFound);
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn batch_isolates_malformed_document() {
    let malformed = bank_text().replace("Basic Tax 1,20,000.00", "Basic Tax ----");

    let batch = process_documents(
        ReceiptKind::Bank,
        vec![
            SourceDocument::new("first.pdf", bank_text()),
            SourceDocument::new("second.pdf", malformed),
            SourceDocument::new("third.pdf", bank_text()),
        ],
    );

    let ok: Vec<&str> = batch.successes().map(|(source, _)| source).collect();
    assert_eq!(ok, vec!["first.pdf", "third.pdf"]);

    let failures = batch.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "second.pdf");
    assert!(failures[0].1.contains("Basic Tax"));

    let table = batch.to_table().unwrap();
    assert_eq!(table.columns.len(), 11);
    assert_eq!(table.columns[0], Column::Bank(BankField::ReceiptDate));
    assert_eq!(
        table.headers()[6],
        "TOTAL"
    );
    assert_eq!(table.rendered_rows(2)[0][6], "124050.50");
    assert_eq!(table.rendered_rows(2)[1][9], "457");
}

#[test]
fn batch_of_failures_has_no_table() {
    let batch = process_documents(
        ReceiptKind::Tax,
        vec![
            SourceDocument::new("a.pdf", bank_text()),
            SourceDocument::new("b.pdf", ""),
        ],
    );

    assert_eq!(batch.failure_count(), 2);
    assert_eq!(batch.to_table(), Err(ExtractionError::EmptyBatch));
}
