//! rlab core: price series, signal sources and the R-multiple trade engine.
//!
//! This crate contains the simulation itself:
//! - Domain types (price series, timeframes, signals, positions, trade records)
//! - Signal source trait and the column-driven implementation
//! - Two-phase row loop: exits first, then entry admission
//! - Append-only trade ledger and engine event observers

pub mod domain;
pub mod engine;
pub mod signals;
