//! authprobe - Auth API Diagnostic CLI
//!
//! A diagnostic tool that exercises a remote authentication and
//! user-management REST API one request per invocation. Tokens and ids
//! captured by one run are persisted in a local JSON store so later runs
//! can consume them.

pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod models;
pub mod store;
