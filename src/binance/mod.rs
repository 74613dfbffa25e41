pub mod client;

pub use client::MarketDataClient;
