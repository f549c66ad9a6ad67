//! Persisted user settings
//!
//! The only persisted value is the last-used compression service URL. It is
//! read by the `getConfig` request and written at most once per batch.

pub mod manager;

pub use manager::{SettingsManager, COMPRESS_SERVICE_URL_KEY, DEFAULT_COMPRESS_SERVICE_URL};
