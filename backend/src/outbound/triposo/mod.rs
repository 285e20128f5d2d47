//! Triposo outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `RecommendationSource` port against the Triposo POI API.

mod dto;
mod http_source;

pub use http_source::{TriposoCredentials, TriposoHttpSource};
