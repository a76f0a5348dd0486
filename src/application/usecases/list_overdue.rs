use chrono::NaiveDate;

use crate::{application::services::LedgerReader, domain::models::InvoiceRow};

/// Unsettled invoices at least `min_days_late` days past due, oldest first.
pub struct ListOverdueUseCase {
    ledger: LedgerReader,
}

impl ListOverdueUseCase {
    pub fn new(ledger: LedgerReader) -> Self {
        Self { ledger }
    }

    pub async fn execute(&self, min_days_late: u32, today: NaiveDate) -> Vec<InvoiceRow> {
        self.ledger.find_overdue(min_days_late, today).await
    }
}
