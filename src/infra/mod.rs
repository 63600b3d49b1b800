//! Concrete feed providers and the prediction override loader.

pub mod feeds;
pub mod overrides;
pub mod tfl;
pub mod waqi;
