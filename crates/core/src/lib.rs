//! Core types for the shortlinker MCP server: configuration loading.

pub mod config;

pub use config::Config;
