pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryInvoiceRepository;
pub use postgres::{LedgerError, PostgresInvoiceRepository, PostgresLedger, with_ledger};
