//! An optional consistency gate that asks an external microservice whether a batch read from a
//! source chain is the batch the microservice expects for the same pair of chains.
//!
//! Any failure to obtain a well-formed answer is reported as an error, never as an implicit
//! "invalid" verdict.

pub mod client;
pub mod config;
pub mod errors;

pub use client::{BatchValidator, DisabledBatchValidator, HttpBatchValidator};
pub use config::BatchValidatorConfig;
pub use errors::ValidatorError;
