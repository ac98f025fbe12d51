//! Configuration Module
//!
//! Client configuration and loading.

pub mod client;
pub mod loader;

pub use client::{ClientConfig, ConfigOverlay, DEFAULT_BASE_URL};
pub use loader::{ConfigLoader, API_BASE_ENV, API_KEY_ENV, CONFIG_PATH_ENV};
