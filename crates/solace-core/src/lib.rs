pub mod config;
pub mod error;
pub mod time;
pub mod types;

pub use config::SolaceConfig;
pub use error::{Result, SolaceError};
pub use types::*;
