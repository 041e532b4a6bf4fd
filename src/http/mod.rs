//! HTTP client module for authprobe

pub mod client;
pub use client::{bearer, ApiClient, Exchange};
