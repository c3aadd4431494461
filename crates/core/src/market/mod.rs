pub mod mexc;
pub mod provider;
pub mod types;
