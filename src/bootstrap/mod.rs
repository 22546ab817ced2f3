pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{default_config_path, load_config, load_or_default};
pub use wiring::{wire_dependencies, WiringError, WiringResult};
