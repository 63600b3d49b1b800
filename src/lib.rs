pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod network;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod services;
pub mod stats;

pub use error::RouteError;
