//! Core library for the `skycast` dashboard.
//!
//! This crate defines:
//! - Static location resolution with a silent default fallback
//! - An Open-Meteo backed provider that fetches and normalizes forecasts
//! - Rule-based story derivation, editorial content merging, and a small
//!   snapshot cache for time-based revalidation
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod config;
pub mod editorial;
pub mod error;
pub mod location;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod stories;

pub use config::Config;
pub use error::FetchError;
pub use location::Location;
pub use model::ForecastBundle;
pub use provider::{ForecastProvider, open_meteo::OpenMeteoProvider};

/// Fetch a normalized forecast bundle for a location key.
///
/// Unknown keys resolve to the default location rather than failing; the
/// returned bundle is labeled with the location that was actually served.
pub async fn get_forecast(key: &str) -> Result<ForecastBundle, FetchError> {
    let location = Location::resolve(key);
    OpenMeteoProvider::new().forecast(location).await
}
