use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::models::InvoiceRow;

/// Read-only access to the receivables ledger.
///
/// Both queries only return dispatch candidates: unpaid flag set, phone
/// present and a positive unpaid amount.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Candidates due exactly on `due_date`, largest total first.
    async fn find_due_on(&self, due_date: NaiveDate) -> anyhow::Result<Vec<InvoiceRow>>;

    /// Candidates due on or before `cutoff` that are not settled, oldest due
    /// date first, then largest total.
    async fn find_overdue(&self, cutoff: NaiveDate) -> anyhow::Result<Vec<InvoiceRow>>;
}
