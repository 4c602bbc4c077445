//! This crate contains the chain-agnostic types that are shared by every other crate in the
//! relayer workspace: the transfer batches read from a source chain, the handles of actions
//! proposed on the multisig contract, and the identifiers of the chains being bridged.
//!
//! It lies at the bottom of the crate-hierarchy in this workspace i.e., it does not depend on any
//! other crate in this workspace.

pub mod action;
pub mod batch;
pub mod chain;
pub mod errors;
pub mod status;
