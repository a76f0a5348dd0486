pub mod invoice;
pub mod period;
pub mod stats;

pub use invoice::{InvoiceRow, SETTLED_STATUS};
pub use period::PeriodCode;
pub use stats::{DispatchStats, RowOutcome};
