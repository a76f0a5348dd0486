pub mod delivery;
pub mod ledger;
pub mod renderer;

pub use delivery::{DeliveryError, DeliveryGateway};
pub use ledger::LedgerReader;
pub use renderer::{MessageRenderer, RenderError};
