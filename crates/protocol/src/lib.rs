//! The relay protocol between Ethereum and Elrond expressed as two step graphs, one per
//! direction.
//!
//! Every step reads the state it needs through an executor capability (see [`executor`]) and
//! routes any operational failure back to the first step of its direction, so that the next poll
//! derives all state from the chains again. Only the perform-class actions are gated on the
//! leader turn; every relayer signs and waits for quorum regardless of who executes.

pub mod elrond_actions;
pub mod elrond_to_eth;
pub mod errors;
pub mod eth_to_elrond;
pub mod executor;

#[cfg(test)]
mod test_utils;
