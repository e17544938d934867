//! Markov chains over named states.
//!
//! This module provides:
//! - **state**: State values and the node value type shared with HMMs
//! - **matrix**: Row-major probability tables and sum checks
//! - **chain**: The Markov chain built on the graph core

pub mod chain;
pub mod matrix;
pub mod state;
