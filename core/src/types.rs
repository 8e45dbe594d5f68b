//! Records produced by the upload response and export file parsers.
//!
//! # Design
//! Field names follow the column headers Teapplix emits, mapped with
//! `#[serde(rename)]` so the CSV readers can deserialize rows directly.

use serde::Deserialize;

/// Outcome reported for one uploaded inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum UploadStatus {
    Success,
    Failed,
    #[serde(other)]
    Unknown,
}

/// One row of an inventory upload response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResultRecord {
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Status")]
    pub status: UploadStatus,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

/// One order from a Teapplix order export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderRecord {
    #[serde(rename = "TxnId")]
    pub txn_id: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "PaymentStatus")]
    pub payment_status: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "Total")]
    pub total: f64,
    #[serde(rename = "Currency")]
    pub currency: String,
}
