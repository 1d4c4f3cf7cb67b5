//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for external services.

pub mod amap;
