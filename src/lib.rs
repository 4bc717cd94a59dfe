//! Gridclash - real-time grid battle engine

pub mod battle;
pub mod core;
pub mod element;
