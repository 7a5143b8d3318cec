pub mod config;
pub mod error;
pub mod sections;

pub use config::{Config, OutputFormat};
pub use error::ConfigError;
