//! Data models: receipt records, export table and configuration.

pub mod config;
pub mod receipt;
pub mod table;
