pub mod period_dispatcher;

pub use period_dispatcher::{PeriodDispatcher, PeriodRun};
