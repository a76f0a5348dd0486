use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Status value the ledger uses once an invoice is paid and reconciled.
pub const SETTLED_STATUS: &str = "ACQUITTED";

/// One receivable as read from the ledger. Never written back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceRow {
    pub id: String,
    pub customer_name: String,
    pub phone: Option<String>,
    pub due_date: NaiveDate,
    pub total: Decimal,
    pub payment_link: Option<String>,
    pub status: Option<String>,
    pub unpaid: Decimal,
    /// Ledger-side "paid" flag, distinct from `status`.
    pub paid: bool,
}

impl InvoiceRow {
    pub fn is_settled(&self) -> bool {
        self.status.as_deref() == Some(SETTLED_STATUS)
    }

    pub fn has_phone(&self) -> bool {
        self.phone.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Eligible for a dunning message: unpaid flag, phone present and money still owed.
    pub fn is_candidate(&self) -> bool {
        !self.paid && self.has_phone() && self.unpaid > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn row() -> InvoiceRow {
        InvoiceRow {
            id: "1".to_string(),
            customer_name: "Ana".to_string(),
            phone: Some("11999998888".to_string()),
            due_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            total: dec!(150.00),
            payment_link: Some("https://pay.example/1".to_string()),
            status: Some("OVERDUE".to_string()),
            unpaid: dec!(150.00),
            paid: false,
        }
    }

    #[test]
    fn candidate_requires_phone_and_positive_unpaid() {
        assert!(row().is_candidate());

        let mut no_phone = row();
        no_phone.phone = Some(String::new());
        assert!(!no_phone.is_candidate());
        no_phone.phone = None;
        assert!(!no_phone.is_candidate());

        let mut nothing_owed = row();
        nothing_owed.unpaid = Decimal::ZERO;
        assert!(!nothing_owed.is_candidate());
        nothing_owed.unpaid = dec!(-1);
        assert!(!nothing_owed.is_candidate());

        let mut flagged_paid = row();
        flagged_paid.paid = true;
        assert!(!flagged_paid.is_candidate());
    }

    #[test]
    fn settled_only_on_sentinel() {
        let mut r = row();
        assert!(!r.is_settled());
        r.status = Some(SETTLED_STATUS.to_string());
        assert!(r.is_settled());
        r.status = None;
        assert!(!r.is_settled());
    }
}
