//! Core business logic abstractions

pub mod config;
pub mod converter;
pub mod currency;
pub mod log;

// Re-export main types for cleaner imports
pub use converter::{ConversionRequest, Converter};
pub use currency::{ConversionError, RateProvider, RateTable};
