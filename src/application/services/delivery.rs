use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::InvoiceRow;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("no usable phone number for invoice {invoice_id}")]
    InvalidPhone { invoice_id: String },
    #[error("gateway rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("gateway request timed out")]
    Timeout,
    #[error("gateway transport error: {0}")]
    Transport(String),
}

/// Outbound channel for rendered dunning messages. One call, one attempt.
#[async_trait]
pub trait DeliveryGateway: Send + Sync {
    async fn send(&self, invoice: &InvoiceRow, message: &str) -> Result<(), DeliveryError>;
}
