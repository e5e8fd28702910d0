//! Sensor Dashboard - history viewer for the industrial monitoring data API
//!
//! This library exposes the core modules for testing and reuse.

pub mod api;
pub mod common;
pub mod config;
pub mod controller;
pub mod error;
pub mod pipeline;
pub mod routes;
