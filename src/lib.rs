pub mod cli;
pub mod commands;
pub mod executor;
pub mod iprange;
pub mod registry;
pub mod script;
pub mod utils;

pub use cli::Cli;
pub use executor::FleetExecutor;
pub use registry::ScriptRegistry;
pub use script::{ScriptAction, ScriptDefinition};
