pub mod list_overdue;
pub mod run_dispatch;

pub use list_overdue::ListOverdueUseCase;
pub use run_dispatch::{PeriodOutcome, RunDispatchUseCase, RunMode, RunSummary};
