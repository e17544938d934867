//! Structural infrastructure shared by the Markov models.
//!
//! This module provides:
//! - **errors**: Error type for lookups, setters, and numerical checks
//! - **status**: Success/failure outcome of graph mutations
//! - **registry**: Identity registry mapping ids and labels to objects
//! - **graph**: Generic directed graph with valued nodes and weighted edges

pub mod errors;
pub mod graph;
pub mod registry;
pub mod status;
