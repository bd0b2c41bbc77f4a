//! Common utilities for the connector crates

pub mod consts;
pub mod errors;
pub mod ext_traits;
pub mod request;
pub mod types;

pub use errors::CustomResult;
