use crate::{error::FetchError, location::Location, model::ForecastBundle};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

/// Abstraction over upstream forecast sources.
///
/// One call produces the complete normalized bundle for a location: current
/// conditions, 12 hourly slots, 7 daily slots and derived stories. The
/// operation is stateless; concurrent calls are independent.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn forecast(&self, location: &Location) -> Result<ForecastBundle, FetchError>;
}
