//! Shared types, errors and configuration for the kwt-sms workspace.

pub mod config;
pub mod db;
pub mod error;
pub mod types;
