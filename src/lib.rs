pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod render;
pub mod transport;
pub mod types;
