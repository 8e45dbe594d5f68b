//! Parsers for the two payloads Teapplix returns.
//!
//! # Design
//! `WebRequestService` only depends on the two traits; the CSV parsers here
//! are the defaults. Both read from a byte stream the caller has positioned at
//! its start.

use std::io::Read;

use serde::de::DeserializeOwned;

use crate::error::ParseError;
use crate::types::{OrderRecord, UploadResultRecord};

/// Turns an inventory upload response body into per-item results.
pub trait UploadResponseParser: Send + Sync {
    fn parse(&self, data: &mut dyn Read) -> Result<Vec<UploadResultRecord>, ParseError>;
}

/// Turns an order export file into order records.
pub trait ExportFileParser: Send + Sync {
    fn parse(&self, data: &mut dyn Read) -> Result<Vec<OrderRecord>, ParseError>;
}

/// Reads upload responses laid out as `SKU,Status,Message`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvUploadResponseParser;

impl UploadResponseParser for CsvUploadResponseParser {
    fn parse(&self, data: &mut dyn Read) -> Result<Vec<UploadResultRecord>, ParseError> {
        read_csv(data)
    }
}

/// Reads order exports with one order line per row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExportFileParser;

impl ExportFileParser for CsvExportFileParser {
    fn parse(&self, data: &mut dyn Read) -> Result<Vec<OrderRecord>, ParseError> {
        read_csv(data)
    }
}

fn read_csv<T: DeserializeOwned>(data: &mut dyn Read) -> Result<Vec<T>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    if reader.headers()?.is_empty() {
        return Err(ParseError::MissingHeader);
    }

    reader
        .deserialize()
        .map(|row| row.map_err(ParseError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UploadStatus;

    const EXPORT_HEADER: &str = "TxnId,Date,PaymentStatus,Name,Email,SKU,Quantity,Total,Currency\n";

    #[test]
    fn upload_response_rows_become_records() {
        let body = "SKU,Status,Message\nWIDGET-1,Success,\nWIDGET-2,Failed,Unknown SKU\n";
        let records = CsvUploadResponseParser.parse(&mut body.as_bytes()).unwrap();
        assert_eq!(
            records,
            vec![
                UploadResultRecord {
                    sku: "WIDGET-1".to_string(),
                    status: UploadStatus::Success,
                    message: None,
                },
                UploadResultRecord {
                    sku: "WIDGET-2".to_string(),
                    status: UploadStatus::Failed,
                    message: Some("Unknown SKU".to_string()),
                },
            ]
        );
    }

    #[test]
    fn unrecognized_upload_status_is_unknown() {
        let body = "SKU,Status,Message\nWIDGET-1,Queued,later\n";
        let records = CsvUploadResponseParser.parse(&mut body.as_bytes()).unwrap();
        assert_eq!(records[0].status, UploadStatus::Unknown);
    }

    #[test]
    fn upload_response_without_message_column() {
        let body = "SKU,Status\nWIDGET-1,Success\n";
        let records = CsvUploadResponseParser.parse(&mut body.as_bytes()).unwrap();
        assert_eq!(records[0].message, None);
    }

    #[test]
    fn export_single_order() {
        let body = format!(
            "{EXPORT_HEADER}TX-1001, 2024/03/01 ,Completed,Jane Doe,jane@example.com,WIDGET-1,2,19.98,USD\n"
        );
        let orders = CsvExportFileParser.parse(&mut body.as_bytes()).unwrap();
        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(order.txn_id, "TX-1001");
        assert_eq!(order.date, "2024/03/01");
        assert_eq!(order.name, "Jane Doe");
        assert_eq!(order.quantity, 2);
        assert_eq!(order.total, 19.98);
        assert_eq!(order.currency, "USD");
    }

    #[test]
    fn export_with_header_only_is_empty() {
        let orders = CsvExportFileParser.parse(&mut EXPORT_HEADER.as_bytes()).unwrap();
        assert!(orders.is_empty());
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = CsvExportFileParser.parse(&mut "".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MissingHeader));
    }

    #[test]
    fn truncated_row_is_rejected() {
        let body = format!("{EXPORT_HEADER}TX-1001,2024/03/01,Completed,Jane");
        let err = CsvExportFileParser.parse(&mut body.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::Csv(_)));
    }

    #[test]
    fn non_numeric_quantity_is_rejected() {
        let body = format!("{EXPORT_HEADER}TX-1,2024/03/01,Completed,J,j@x.io,W,two,1.00,USD\n");
        let err = CsvExportFileParser.parse(&mut body.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::Csv(_)));
    }
}
