mod client;

pub use client::WaqiClient;
