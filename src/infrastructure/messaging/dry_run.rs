use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    application::services::{DeliveryError, DeliveryGateway},
    domain::{models::InvoiceRow, value_objects::PhoneNumber},
};

/// Logs what would be sent and reports success without touching the network.
#[derive(Debug, Default)]
pub struct DryRunGateway;

impl DryRunGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DeliveryGateway for DryRunGateway {
    async fn send(&self, invoice: &InvoiceRow, message: &str) -> Result<(), DeliveryError> {
        let Some(number) = PhoneNumber::parse(invoice.phone.as_deref().unwrap_or_default()) else {
            warn!(invoice_id = %invoice.id, customer = %invoice.customer_name, "[dry-run] invalid phone number");
            return Err(DeliveryError::InvalidPhone {
                invoice_id: invoice.id.clone(),
            });
        };
        info!(
            customer = %invoice.customer_name,
            phone = %number,
            "[dry-run] would send:\n{message}"
        );
        Ok(())
    }
}
