pub mod config;
pub mod count;
pub mod error;
pub mod query;

pub use config::Config;
pub use error::{ConfigError, CountError};
