pub mod configs;
pub mod logger;
pub mod service;
pub mod shared_metrics;

pub use service::*;
