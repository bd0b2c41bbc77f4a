pub mod connectors;
pub mod gateway;
pub mod types;
pub mod utils;
