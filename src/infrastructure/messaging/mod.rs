pub mod dry_run;
pub mod evolution;

pub use dry_run::DryRunGateway;
pub use evolution::EvolutionClient;
