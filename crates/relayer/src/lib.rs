//! The relayer: runs one state machine per bridge direction over a set of chain clients.
//!
//! Both machines poll independently and share nothing but the clients handed to them.

pub mod config;
pub mod errors;
mod relayer;

pub use config::Config;
pub use errors::{ConfigError, RelayerError};
pub use relayer::Relayer;
