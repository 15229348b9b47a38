//! CSV loader for the debt list.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). All header
//! names are case-sensitive and must match exactly. Whitespace around values
//! is trimmed.
//!
//! | Column            | Required | Type    | Notes                                   |
//! |-------------------|----------|---------|-----------------------------------------|
//! | `id`              | yes      | string  | Any label, e.g. `visa`                  |
//! | `type`            | yes      | string  | `credit_card`, `student_loan`, `other`  |
//! | `balance`         | yes      | decimal | e.g. `3500.00`                          |
//! | `apr`             | yes      | decimal | Annual percentage rate, e.g. `24.99`    |
//! | `minimum_payment` | yes      | decimal | Monthly minimum                         |
//!
//! ### Example
//!
//! ```csv
//! id,type,balance,apr,minimum_payment
//! visa,credit_card,3500.00,24.99,120.00
//! federal,student_loan,28000.00,5.5,320.00
//! ```
//!
//! Range checks (APR within 0–100, amounts not negative) happen later, when
//! the debts are validated together with the rest of the wizard input.
use std::path::{Path, PathBuf};

use budget_core::{Debt, DebtType};
use rust_decimal::Decimal;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    #[serde(rename = "type")]
    debt_type: String,
    balance: Decimal,
    apr: Decimal,
    minimum_payment: Decimal,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading the debts CSV.
#[derive(Debug, thiserror::Error)]
pub enum DebtCsvError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `type` cell is not one of the recognised debt types. `row` is
    /// 1-based (header = row 0).
    #[error("unrecognised debt type '{value}' on row {row}")]
    InvalidDebtType { value: String, row: usize },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<Debt, DebtCsvError> {
    let debt_type =
        DebtType::parse(&row.debt_type).ok_or_else(|| DebtCsvError::InvalidDebtType {
            value: row.debt_type,
            row: row_number,
        })?;

    Ok(Debt {
        id: row.id,
        debt_type,
        balance: row.balance,
        apr: row.apr,
        minimum_payment: row.minimum_payment,
    })
}

/// Parse CSV text and return the debts in file order.
///
/// # Errors
///
/// * [DebtCsvError::Parse] – if the CSV is structurally invalid or a
///   required field cannot be deserialised.
/// * [DebtCsvError::InvalidDebtType] – if any row has an unknown `type`.
pub fn load_from_str(input: &str) -> Result<Vec<Debt>, DebtCsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &Path) -> Result<Vec<Debt>, DebtCsvError> {
    let contents = std::fs::read_to_string(path).map_err(|source| DebtCsvError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let debts = load_from_str(&contents)?;
    tracing::debug!(path = %path.display(), count = debts.len(), "loaded debts CSV");
    Ok(debts)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const TWO_DEBTS_CSV: &str = "\
id,type,balance,apr,minimum_payment
visa,credit_card,3500.00,24.99,120.00
federal,student_loan,28000.00,5.5,320.00
";

    // -----------------------------------------------------------------------
    // 1. Happy path
    // -----------------------------------------------------------------------
    #[test]
    fn test_rows_parse_in_file_order() {
        let debts = load_from_str(TWO_DEBTS_CSV).expect("should parse");

        assert_eq!(debts.len(), 2);
        assert_eq!(
            debts[0],
            Debt {
                id: "visa".to_string(),
                debt_type: DebtType::CreditCard,
                balance: dec!(3500.00),
                apr: dec!(24.99),
                minimum_payment: dec!(120.00),
            }
        );
        assert_eq!(debts[1].id, "federal");
        assert_eq!(debts[1].debt_type, DebtType::StudentLoan);
    }

    #[test]
    fn test_every_debt_type_is_recognised() {
        let test_cases = [
            ("credit_card", DebtType::CreditCard),
            ("student_loan", DebtType::StudentLoan),
            ("other", DebtType::Other),
        ];

        for (value, expected) in test_cases {
            let csv = format!("id,type,balance,apr,minimum_payment\nx,{value},1,1,1\n");
            let debts = load_from_str(&csv)
                .unwrap_or_else(|e| panic!("failed to parse CSV for type '{value}': {e}"));

            assert_eq!(debts[0].debt_type, expected, "type '{value}'");
        }
    }

    // -----------------------------------------------------------------------
    // 2. Errors
    // -----------------------------------------------------------------------
    #[test]
    fn test_invalid_debt_type_reports_row() {
        let csv = "\
id,type,balance,apr,minimum_payment
a,credit_card,1,1,1
b,mortgage,2,2,2
";

        match load_from_str(csv).unwrap_err() {
            DebtCsvError::InvalidDebtType { value, row } => {
                assert_eq!(value, "mortgage");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidDebtType, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_column_returns_parse_error() {
        let csv = "id,type,balance,apr\na,other,1,1\n";

        match load_from_str(csv).unwrap_err() {
            DebtCsvError::Parse(_) => {}
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_balance_returns_parse_error() {
        let csv = "id,type,balance,apr,minimum_payment\na,other,lots,1,1\n";

        assert!(matches!(load_from_str(csv), Err(DebtCsvError::Parse(_))));
    }

    #[test]
    fn test_missing_file_returns_io_error() {
        let err = load_from_file(Path::new("definitely/not/here.csv")).unwrap_err();

        assert!(matches!(err, DebtCsvError::Io { .. }));
        assert!(err.to_string().contains("here.csv"));
    }

    // -----------------------------------------------------------------------
    // 3. Tolerance
    // -----------------------------------------------------------------------
    #[test]
    fn test_header_only_yields_no_debts() {
        let debts = load_from_str("id,type,balance,apr,minimum_payment\n").expect("valid");
        assert!(debts.is_empty());
    }

    #[test]
    fn test_whitespace_and_column_order() {
        let csv = "\
minimum_payment , apr , balance , type , id
 50 , 7.25 , 1200 , other , car
";
        let debts = load_from_str(csv).expect("should tolerate whitespace and order");

        assert_eq!(debts[0].id, "car");
        assert_eq!(debts[0].debt_type, DebtType::Other);
        assert_eq!(debts[0].balance, dec!(1200));
        assert_eq!(debts[0].apr, dec!(7.25));
        assert_eq!(debts[0].minimum_payment, dec!(50));
    }
}
