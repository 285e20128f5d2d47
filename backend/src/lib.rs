//! Trip planning backend.
//!
//! Assembles candidate events for multi-day trips from a recommendation
//! provider and hands the pool to a downstream scheduler. The crate is laid
//! out hexagonally: [`domain`] owns types, services, and ports; [`outbound`]
//! holds the adapters; [`config`] loads runtime settings.

pub mod config;
pub mod domain;
pub mod outbound;
